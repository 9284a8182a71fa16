//! Transcription port - Interface for audio to phoneme recognition

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for turning a learner's recorded clip into a phoneme string
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe a recorded clip into phonemes
    ///
    /// # Arguments
    /// * `audio_data` - Raw bytes of the uploaded clip
    /// * `format` - Container format of the clip
    ///
    /// # Errors
    /// Returns `ApplicationError::ModelFailure` if the audio cannot be decoded
    /// or the recognizer is unavailable.
    async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<String, ApplicationError>;

    /// Check if the recognizer can currently be used
    async fn is_available(&self) -> bool;

    /// Provider identifier used in logs and readiness reports
    fn provider_name(&self) -> &'static str;
}
