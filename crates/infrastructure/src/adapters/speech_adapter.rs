//! Speech adapters - Implement the transcription, phonemizer and synthesis
//! ports using the ai_speech crate

use std::sync::Arc;

use ai_speech::{AudioData, PhonemeRecognizer, Phonemizer, SpeechError, TextToSpeech};
use application::error::ApplicationError;
use application::ports::{PhonemizerPort, SynthesisPort, SynthesizedAudio, TranscriptionPort};
use async_trait::async_trait;
use domain::AudioFormat;
use tracing::{debug, instrument, warn};

/// Map speech error to application error
///
/// Everything a provider can fail with at request time is a model failure;
/// only configuration problems keep their own category.
fn map_error(operation: &str, err: SpeechError) -> ApplicationError {
    match err {
        SpeechError::Configuration(e) => ApplicationError::Configuration(e),
        SpeechError::Timeout(timeout_ms) => ApplicationError::Timeout {
            operation: operation.to_string(),
            timeout_ms,
        },
        other => {
            warn!(operation, error = %other, "Speech provider failed");
            ApplicationError::ModelFailure(other.to_string())
        },
    }
}

/// Adapter exposing a `PhonemeRecognizer` as the transcription port
pub struct RecognizerAdapter {
    recognizer: Arc<dyn PhonemeRecognizer>,
    name: &'static str,
}

impl std::fmt::Debug for RecognizerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerAdapter")
            .field("name", &self.name)
            .field("model", &self.recognizer.model_name())
            .finish()
    }
}

impl RecognizerAdapter {
    /// Wrap a recognizer under the given provider identifier
    pub fn new(recognizer: impl PhonemeRecognizer + 'static, name: &'static str) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            name,
        }
    }
}

#[async_trait]
impl TranscriptionPort for RecognizerAdapter {
    #[instrument(skip(self, audio_data), fields(provider = self.name, format = %format, data_size = audio_data.len()))]
    async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<String, ApplicationError> {
        let transcription = self
            .recognizer
            .recognize(AudioData::new(audio_data, format))
            .await
            .map_err(|e| map_error("transcribe", e))?;

        debug!(
            phonemes = %transcription.text,
            model = ?transcription.model,
            "Recognition complete"
        );
        Ok(transcription.text)
    }

    async fn is_available(&self) -> bool {
        self.recognizer.is_available().await
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Adapter exposing a `Phonemizer` as the phonemizer port
pub struct PhonemizerAdapter {
    phonemizer: Arc<dyn Phonemizer>,
    name: &'static str,
}

impl std::fmt::Debug for PhonemizerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhonemizerAdapter")
            .field("name", &self.name)
            .field("voice", &self.phonemizer.voice())
            .finish()
    }
}

impl PhonemizerAdapter {
    /// Wrap a phonemizer under the given provider identifier
    pub fn new(phonemizer: impl Phonemizer + 'static, name: &'static str) -> Self {
        Self {
            phonemizer: Arc::new(phonemizer),
            name,
        }
    }
}

#[async_trait]
impl PhonemizerPort for PhonemizerAdapter {
    #[instrument(skip(self), fields(provider = self.name))]
    async fn phonemize(&self, text: &str) -> Result<String, ApplicationError> {
        self.phonemizer
            .phonemize(text)
            .await
            .map_err(|e| map_error("phonemize", e))
    }

    async fn is_available(&self) -> bool {
        self.phonemizer.is_available().await
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Adapter exposing a `TextToSpeech` provider as the synthesis port
pub struct SynthesisAdapter {
    provider: Arc<dyn TextToSpeech>,
    name: &'static str,
}

impl std::fmt::Debug for SynthesisAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesisAdapter")
            .field("name", &self.name)
            .field("model", &self.provider.model_name())
            .finish()
    }
}

impl SynthesisAdapter {
    /// Wrap a TTS provider under the given provider identifier
    pub fn new(provider: impl TextToSpeech + 'static, name: &'static str) -> Self {
        Self {
            provider: Arc::new(provider),
            name,
        }
    }
}

#[async_trait]
impl SynthesisPort for SynthesisAdapter {
    #[instrument(skip(self, text), fields(provider = self.name, text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, ApplicationError> {
        let audio = self
            .provider
            .synthesize(text)
            .await
            .map_err(|e| map_error("synthesize", e))?;

        debug!(size = audio.size_bytes(), format = %audio.format(), "Synthesis complete");
        let format = audio.format();
        Ok(SynthesizedAudio::new(audio.into_data(), format))
    }

    async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
