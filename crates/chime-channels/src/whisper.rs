//! Whisper speech-to-text: turns a recorded command into an utterance.

use async_trait::async_trait;
use chime_core::{config::TranscriptionConfig, error::ChimeError, traits::Transcriber};
use serde::Deserialize;
use tracing::{debug, info};

/// Whisper API response.
#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcriber backed by an OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from config. Fails when no API key is configured or in the environment.
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self, ChimeError> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            ChimeError::Config(
                "transcription is enabled but no api_key is set. \
                 Set it in config.toml or OPENAI_API_KEY env var."
                    .to_string(),
            )
        })?;
        Ok(Self::new(api_key, &config.model, &config.base_url))
    }
}

/// MIME type for an audio file name, by extension.
pub fn audio_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, ChimeError> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(file_name.to_string())
            .mime_str(audio_mime(file_name))
            .map_err(|e| ChimeError::Transcription(format!("whisper mime error: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        debug!("sending {} bytes to whisper ({})", audio.len(), self.model);
        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                ChimeError::Transcription(format!("Speech recognition service error: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChimeError::Transcription(format!(
                "Speech recognition service error {status}: {body}"
            )));
        }

        let result: WhisperResponse = resp.json().await.map_err(|e| {
            ChimeError::Transcription(format!("whisper response parse failed: {e}"))
        })?;

        let text = result.text.trim();
        if text.is_empty() {
            return Err(ChimeError::Transcription(
                "Could not understand audio.".to_string(),
            ));
        }
        info!("transcribed: {text}");
        Ok(text.to_string())
    }
}
