//! Synthesis port - Interface for text-to-speech

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Audio produced by a synthesis provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes
    pub data: Vec<u8>,
    /// Format of `data`
    pub format: AudioFormat,
}

impl SynthesizedAudio {
    /// Create a new synthesized clip
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// MIME type to serve the clip with
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Port for synthesizing reference audio
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize speech for the given text
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, ApplicationError>;

    /// Check if the synthesizer can currently be used
    async fn is_available(&self) -> bool;

    /// Provider identifier used in logs and readiness reports
    fn provider_name(&self) -> &'static str;
}
