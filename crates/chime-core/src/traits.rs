use crate::{error::ChimeError, notice::Notice};
use async_trait::async_trait;

/// Speech-to-text collaborator.
///
/// Turns recorded audio into a single utterance string. Failures are
/// reported verbatim and never retried.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Transcribe raw audio bytes (any container the backend accepts).
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, ChimeError>;
}

/// Audio playback collaborator. On/off only.
pub trait AudioSink: Send + Sync {
    /// Start the alarm sound, looping until [`AudioSink::stop`] when `looped`.
    fn play(&self, looped: bool) -> Result<(), ChimeError>;

    /// Stop any playing alarm sound. Stopping silence is a no-op.
    fn stop(&self);
}

/// Display collaborator: dialogs and the active alarm list.
pub trait Notifier: Send + Sync {
    /// Show a notification to the user.
    fn notify(&self, notice: &Notice);

    /// Replace the displayed alarm list with `entries`, in order.
    fn show_alarms(&self, entries: &[String]);
}
