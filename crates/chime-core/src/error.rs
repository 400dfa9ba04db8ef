use thiserror::Error;

/// Top-level error type for Chime.
#[derive(Debug, Error)]
pub enum ChimeError {
    /// No time phrase could be extracted from an utterance.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// A time token could not be parsed into a valid 12-hour clock time.
    #[error("could not parse time format: {0}")]
    TimeFormat(String),

    /// Speech transcription failed (unintelligible audio or service error).
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Alarm history could not be written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Audio playback error.
    #[error("audio error: {0}")]
    Audio(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

impl ChimeError {
    /// Message shown to the user in a dialog, without the error-kind prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Extraction(msg) | Self::Transcription(msg) | Self::Persistence(msg) => {
                msg.clone()
            }
            Self::TimeFormat(token) => format!("Could not parse time format: {token}"),
            Self::Audio(msg) => format!("Error playing sound: {msg}"),
            other => other.to_string(),
        }
    }
}
