//! Pronunciation service - the tutoring request flows
//!
//! Composes the strategy providers with the domain's scorer. Every provider
//! call is bounded by a timeout; transcription and synthesis additionally
//! share a limited pool of inference permits so that slow model calls
//! cannot starve lightweight requests.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use domain::{AudioFormat, DomainError, Score, score};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::health_service::{HealthService, ReadinessReport};
use crate::error::ApplicationError;
use crate::ports::{
    FeedbackPort, PhonemizerPort, SynthesisPort, SynthesizedAudio, TranscriptionPort,
};

/// Feedback returned without consulting a provider when the attempt is perfect
pub const PERFECT_FEEDBACK: &str = "Perfect pronunciation! Well done!";

/// Default timeout for a single provider call in seconds
const DEFAULT_PORT_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent transcription/synthesis calls
const DEFAULT_MAX_CONCURRENT_INFERENCE: usize = 2;

/// The active strategy providers, selected once at startup
#[derive(Clone)]
pub struct Providers {
    /// Audio to phonemes
    pub transcription: Arc<dyn TranscriptionPort>,
    /// Text to reference IPA
    pub phonemizer: Arc<dyn PhonemizerPort>,
    /// Coaching text
    pub feedback: Arc<dyn FeedbackPort>,
    /// Text to speech
    pub synthesis: Arc<dyn SynthesisPort>,
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("transcription", &self.transcription.provider_name())
            .field("phonemizer", &self.phonemizer.provider_name())
            .field("feedback", &self.feedback.provider_name())
            .field("synthesis", &self.synthesis.provider_name())
            .finish()
    }
}

/// Limits applied around provider calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronunciationConfig {
    /// Upper bound for one provider call, including the wait for a permit
    pub port_timeout: Duration,
    /// Number of transcription/synthesis calls allowed to run at once
    pub max_concurrent_inference: usize,
}

impl Default for PronunciationConfig {
    fn default() -> Self {
        Self {
            port_timeout: Duration::from_secs(DEFAULT_PORT_TIMEOUT_SECS),
            max_concurrent_inference: DEFAULT_MAX_CONCURRENT_INFERENCE,
        }
    }
}

/// A scored attempt with both transcriptions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAttempt {
    /// Target word or sentence
    pub text: String,
    /// Reference IPA
    pub correct_ipa: String,
    /// Learner's phonemes
    pub attempt_ipa: String,
    /// Similarity between `correct_ipa` and `attempt_ipa`
    pub score: Score,
}

/// Orchestrates the tutoring flows over the configured providers
#[derive(Debug)]
pub struct PronunciationService {
    providers: Providers,
    config: PronunciationConfig,
    inference_permits: Semaphore,
    health: HealthService,
}

impl PronunciationService {
    /// Create the service
    #[must_use]
    pub fn new(providers: Providers, config: PronunciationConfig) -> Self {
        let health = HealthService::new(providers.clone()).with_timeout(config.port_timeout);
        Self {
            inference_permits: Semaphore::new(config.max_concurrent_inference.max(1)),
            providers,
            config,
            health,
        }
    }

    /// The active providers
    #[must_use]
    pub const fn providers(&self) -> &Providers {
        &self.providers
    }

    /// The limits in effect
    #[must_use]
    pub const fn config(&self) -> &PronunciationConfig {
        &self.config
    }

    /// Reference IPA for a word or sentence
    #[instrument(skip(self))]
    pub async fn reference_ipa(&self, word: &str) -> Result<String, ApplicationError> {
        self.phonemize("word", word).await
    }

    /// Score a typed attempt against the reference IPA of `word`
    #[instrument(skip(self))]
    pub async fn score_attempt(
        &self,
        word: &str,
        attempt_ipa: &str,
    ) -> Result<ScoredAttempt, ApplicationError> {
        let correct_ipa = self.phonemize("word", word).await?;
        let score = score(&correct_ipa, attempt_ipa);
        debug!(score = %score, "Attempt scored");

        Ok(ScoredAttempt {
            text: word.trim().to_string(),
            correct_ipa,
            attempt_ipa: attempt_ipa.to_string(),
            score,
        })
    }

    /// Recognize the phonemes in a recorded clip
    #[instrument(skip(self, audio_data), fields(size = audio_data.len()))]
    pub async fn audio_phonemes(
        &self,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<String, ApplicationError> {
        if audio_data.is_empty() {
            return Err(DomainError::empty_field("file").into());
        }

        let phonemes = self
            .call_inference(
                "transcribe",
                self.providers.transcription.transcribe(audio_data, format),
            )
            .await?;
        Ok(phonemes.trim().to_string())
    }

    /// Phonemize `text` and recognize the clip concurrently, then score
    #[instrument(skip(self, audio_data), fields(size = audio_data.len()))]
    pub async fn score_audio(
        &self,
        text: &str,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<ScoredAttempt, ApplicationError> {
        let text = required("text", text)?;

        let (correct_ipa, attempt_ipa) = tokio::try_join!(
            self.phonemize("text", text),
            self.audio_phonemes(audio_data, format)
        )?;
        let score = score(&correct_ipa, &attempt_ipa);
        info!(score = %score, "Audio attempt scored");

        Ok(ScoredAttempt {
            text: text.to_string(),
            correct_ipa,
            attempt_ipa,
            score,
        })
    }

    /// Coaching feedback from the configured provider
    ///
    /// A perfect score short-circuits without calling the provider.
    #[instrument(skip(self))]
    pub async fn feedback(
        &self,
        word: &str,
        correct_ipa: &str,
        attempt_ipa: &str,
        score: Score,
    ) -> Result<String, ApplicationError> {
        if score.is_perfect() {
            debug!("Perfect score, skipping feedback provider");
            return Ok(PERFECT_FEEDBACK.to_string());
        }

        let word = required("text", word)?;
        self.call_port(
            "generate_feedback",
            self.providers
                .feedback
                .generate_feedback(word, correct_ipa, attempt_ipa),
        )
        .await
    }

    /// Synthesize reference audio
    #[instrument(skip(self))]
    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, ApplicationError> {
        let text = required("text", text)?;
        self.call_inference("synthesize", self.providers.synthesis.synthesize(text))
            .await
    }

    /// Availability of each configured provider
    pub async fn readiness(&self) -> ReadinessReport {
        self.health.check_all().await
    }

    async fn phonemize(&self, field: &str, text: &str) -> Result<String, ApplicationError> {
        let text = required(field, text)?;
        let ipa = self
            .call_port("phonemize", self.providers.phonemizer.phonemize(text))
            .await?;
        Ok(ipa.trim().to_string())
    }

    async fn call_inference<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        self.call_port(operation, async {
            let _permit = self
                .inference_permits
                .acquire()
                .await
                .map_err(|_| ApplicationError::Internal("inference limiter closed".to_string()))?;
            call.await
        })
        .await
    }

    async fn call_port<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        if let Ok(result) = timeout(self.config.port_timeout, call).await {
            result
        } else {
            let timeout_ms = u64::try_from(self.config.port_timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, timeout_ms, "Provider call timed out");
            Err(ApplicationError::Timeout {
                operation: operation.to_string(),
                timeout_ms,
            })
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::empty_field(field))
    } else {
        Ok(trimmed)
    }
}
