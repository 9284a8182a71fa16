//! OpenAI-compatible text-to-speech
//!
//! Calls `{base_url}/audio/speech` and always requests WAV so reference
//! audio has the same container regardless of provider.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::OpenAiTtsConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

/// OpenAI TTS has a 4096 character limit
const MAX_INPUT_CHARS: usize = 4096;

/// OpenAI-compatible TTS provider
#[derive(Debug, Clone)]
pub struct OpenAiTtsProvider {
    client: Client,
    config: OpenAiTtsConfig,
}

/// OpenAI TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

impl OpenAiTtsProvider {
    /// Create a new OpenAI TTS provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: OpenAiTtsConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn speed(&self) -> Option<f32> {
        if (self.config.speed - 1.0).abs() < f32::EPSILON {
            None
        } else {
            Some(self.config.speed)
        }
    }
}

#[async_trait]
impl TextToSpeech for OpenAiTtsProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.config.model))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: exceeds {MAX_INPUT_CHARS} character limit"
            )));
        }

        let request = TtsRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            response_format: "wav",
            speed: self.speed(),
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url()))
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    Some("model_not_found") => {
                        Err(SpeechError::ModelNotAvailable(self.config.model.clone()))
                    },
                    _ => Err(SpeechError::SynthesisFailed(api_error.error.message)),
                };
            }

            return Err(SpeechError::SynthesisFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let audio_bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        if audio_bytes.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Empty audio response".to_string(),
            ));
        }

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");
        Ok(AudioData::new(audio_bytes.to_vec(), AudioFormat::Wav))
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/models", self.base_url()))
            .bearer_auth(self.api_key())
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
