//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech processing
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid audio format or corrupted data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Phoneme recognition failed
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    /// Text to IPA conversion failed
    #[error("Phonemization failed: {0}")]
    PhonemizationFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid response from service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during processing
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Audio processing/conversion failed
    #[error("Audio processing failed: {0}")]
    AudioProcessing(String),

    /// Provider not available (not installed or configured)
    #[error("Provider not available: {0}")]
    NotAvailable(String),
}

impl SpeechError {
    /// Map a reqwest error, reporting timeouts with the configured limit
    pub fn from_reqwest(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failed_error_message() {
        let err = SpeechError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn invalid_audio_error_message() {
        let err = SpeechError::InvalidAudio("empty clip".to_string());
        assert_eq!(err.to_string(), "Invalid audio: empty clip");
    }

    #[test]
    fn recognition_failed_error_message() {
        let err = SpeechError::RecognitionFailed("no speech detected".to_string());
        assert_eq!(err.to_string(), "Recognition failed: no speech detected");
    }

    #[test]
    fn phonemization_failed_error_message() {
        let err = SpeechError::PhonemizationFailed("unknown voice".to_string());
        assert_eq!(err.to_string(), "Phonemization failed: unknown voice");
    }

    #[test]
    fn synthesis_failed_error_message() {
        let err = SpeechError::SynthesisFailed("invalid text".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: invalid text");
    }

    #[test]
    fn timeout_error_message() {
        let err = SpeechError::Timeout(30000);
        assert_eq!(err.to_string(), "Speech processing timeout after 30000ms");
    }

    #[test]
    fn configuration_error_message() {
        let err = SpeechError::Configuration("missing model".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing model");
    }
}
