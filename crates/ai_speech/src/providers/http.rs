//! Remote phoneme recognition over HTTP
//!
//! Posts the normalized WAV clip to `{base_url}/models/{model}` and reads
//! `{"text": "..."}` back. This matches hosted inference APIs that serve
//! wav2vec2 CTC models.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::HttpRecognizerConfig;
use crate::converter::AudioConverter;
use crate::error::SpeechError;
use crate::ports::PhonemeRecognizer;
use crate::types::{AudioData, Transcription};

/// Phoneme recognizer backed by an HTTP inference endpoint
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    client: Client,
    config: HttpRecognizerConfig,
    converter: AudioConverter,
}

/// Recognition response
#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    text: String,
}

/// Error body returned by inference APIs
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpRecognizer {
    /// Create a new HTTP recognizer
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: HttpRecognizerConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;
        let converter = AudioConverter::with_ffmpeg_path(config.ffmpeg_path.clone());

        Ok(Self {
            client,
            config,
            converter,
        })
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => builder.bearer_auth(key),
            _ => builder,
        }
    }

    fn map_status(&self, status: StatusCode, body: &str) -> SpeechError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map_or_else(|_| format!("HTTP {status}: {body}"), |b| b.error);
        match status {
            StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
            StatusCode::NOT_FOUND | StatusCode::SERVICE_UNAVAILABLE => {
                SpeechError::ModelNotAvailable(format!("{}: {message}", self.config.model))
            },
            _ => SpeechError::RecognitionFailed(message),
        }
    }
}

#[async_trait]
impl PhonemeRecognizer for HttpRecognizer {
    #[instrument(skip(self, audio), fields(format = %audio.format(), size = audio.size_bytes()))]
    async fn recognize(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        let wav = self.converter.to_recognition_wav(&audio).await?;
        debug!(bytes = wav.size_bytes(), "Posting clip for recognition");

        let response = self
            .request(self.client.post(self.model_url()))
            .header(reqwest::header::CONTENT_TYPE, wav.mime_type())
            .body(wav.into_data())
            .send()
            .await
            .map_err(|e| SpeechError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_status(status, &body));
        }

        let parsed: RecognitionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Ok(Transcription::new(parsed.text.trim()).with_model(&self.config.model))
    }

    async fn is_available(&self) -> bool {
        self.request(self.client.get(self.model_url()))
            .send()
            .await
            .is_ok_and(|r| !r.status().is_server_error() && r.status() != StatusCode::NOT_FOUND)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
