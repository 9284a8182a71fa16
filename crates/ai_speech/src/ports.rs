//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription};

/// Port for phoneme recognition (audio to IPA)
///
/// Implementations accept a recorded clip in any supported format and return
/// the phonemes the speaker actually produced.
///
/// # Example
///
/// ```ignore
/// use ai_speech::{AudioData, PhonemeRecognizer};
///
/// async fn attempt_ipa(
///     recognizer: &impl PhonemeRecognizer,
///     audio: AudioData,
/// ) -> Result<String, SpeechError> {
///     Ok(recognizer.recognize(audio).await?.text)
/// }
/// ```
#[async_trait]
pub trait PhonemeRecognizer: Send + Sync {
    /// Recognize the phonemes in a clip
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::InvalidAudio` for empty clips and other
    /// `SpeechError` variants if conversion or inference fails.
    async fn recognize(&self, audio: AudioData) -> Result<Transcription, SpeechError>;

    /// Check if the recognizer is available
    async fn is_available(&self) -> bool;

    /// Get the name of the recognition model
    fn model_name(&self) -> &str;
}

/// Port for reference phonemization (text to IPA)
#[async_trait]
pub trait Phonemizer: Send + Sync {
    /// Convert text to its IPA transcription
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the phonemizer fails.
    async fn phonemize(&self, text: &str) -> Result<String, SpeechError>;

    /// Check if the phonemizer is available
    async fn is_available(&self) -> bool;

    /// Get the voice or language the phonemizer uses
    fn voice(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
///
/// Implementations return WAV audio.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::SynthesisFailed` for empty text and other
    /// `SpeechError` variants if synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError>;

    /// Check if the TTS service is available
    async fn is_available(&self) -> bool;

    /// Get the name of the current TTS model
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFormat;

    /// Mock implementation for testing
    struct MockRecognizer {
        model: String,
        available: bool,
    }

    #[async_trait]
    impl PhonemeRecognizer for MockRecognizer {
        async fn recognize(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
            if audio.is_empty() {
                return Err(SpeechError::InvalidAudio("empty".to_string()));
            }
            Ok(Transcription::new("b ɔ̃ ʒ u ʁ").with_model(&self.model))
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        fn model_name(&self) -> &str {
            &self.model
        }
    }

    struct MockPhonemizer;

    #[async_trait]
    impl Phonemizer for MockPhonemizer {
        async fn phonemize(&self, text: &str) -> Result<String, SpeechError> {
            Ok(format!("/{text}/"))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn voice(&self) -> &str {
            "fr-fr"
        }
    }

    #[tokio::test]
    async fn recognizer_trait_object_works() {
        let recognizer: Box<dyn PhonemeRecognizer> = Box::new(MockRecognizer {
            model: "mock".to_string(),
            available: true,
        });
        let result = recognizer
            .recognize(AudioData::new(vec![1], AudioFormat::Wav))
            .await
            .unwrap();
        assert_eq!(result.model.as_deref(), Some("mock"));
        assert!(recognizer.is_available().await);
        assert_eq!(recognizer.model_name(), "mock");
    }

    #[tokio::test]
    async fn recognizer_rejects_empty_audio() {
        let recognizer = MockRecognizer {
            model: "mock".to_string(),
            available: false,
        };
        let result = recognizer
            .recognize(AudioData::new(vec![], AudioFormat::Wav))
            .await;
        assert!(matches!(result, Err(SpeechError::InvalidAudio(_))));
        assert!(!recognizer.is_available().await);
    }

    #[tokio::test]
    async fn phonemizer_trait_object_works() {
        let phonemizer: Box<dyn Phonemizer> = Box::new(MockPhonemizer);
        assert_eq!(phonemizer.phonemize("oui").await.unwrap(), "/oui/");
        assert_eq!(phonemizer.voice(), "fr-fr");
    }
}
