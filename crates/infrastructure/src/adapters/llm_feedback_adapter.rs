//! LLM feedback adapter - Implements FeedbackPort using an ai_core inference engine
//!
//! Works with any `InferenceEngine`: Ollama and llama.cpp servers.

use std::sync::Arc;
use std::time::Instant;

use ai_core::{InferenceEngine, InferenceError, InferenceMessage, InferenceRequest};
use application::error::ApplicationError;
use application::ports::FeedbackPort;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Role given to the model
pub const COACH_SYSTEM_PROMPT: &str = "You are a friendly French pronunciation coach for beginners. \
Give clear, simple feedback, explain how to pronounce words using English approximations, \
give one short example, and tips to improve. Do not focus only on phonetic symbols.";

/// Worked examples shown before the learner's case: (word, expected, attempt, answer)
const WORKED_EXAMPLES: [(&str, &str, &str, &str); 2] = [
    (
        "merci",
        "/mɛʁsi/",
        "/mursi/",
        "Good attempt! In 'merci', the first vowel should sound like 'eh' in 'bed' (/ɛ/), \
but you made it closer to 'oo' (/u/). Try 'mehr-see' instead of 'moor-see'. \
Tip: open your mouth slightly more for the 'eh' sound.",
    ),
    (
        "bonjour",
        "/bɔ̃ʒuʁ/",
        "/bonʒuʁ/",
        "Nice try! In 'bonjour', the 'on' is nasal (/ɔ̃/), but you pronounced it like a normal 'on'. \
Think of 'bohn' but let the sound come through your nose: 'bõn-zhoor'. \
Tip: practice by humming while saying 'on'.",
    ),
];

/// Case sent once at startup to load the model
const WARM_UP_CASE: (&str, &str, &str) = ("bonjour", "/bɔ̃ʒuʁ/", "/bonʒuʁ/");

/// User turn describing one attempt
fn coach_turn(word: &str, expected: &str, attempt: &str) -> String {
    format!(
        "The user said: '{word}'\n\
         Expected pronunciation (IPA): {expected}\n\
         User pronunciation (IPA): {attempt}\n\
         Identify any pronunciation mistakes and give concise, beginner-friendly feedback \
         using English approximations, with one example and tips to improve. \
         Only provide the feedback text."
    )
}

/// Full chat for one attempt: system prompt, worked examples, then the learner's case
pub fn coach_messages(word: &str, expected: &str, attempt: &str) -> Vec<InferenceMessage> {
    let mut messages = Vec::with_capacity(2 + WORKED_EXAMPLES.len() * 2);
    messages.push(InferenceMessage::system(COACH_SYSTEM_PROMPT));
    for (example_word, example_expected, example_attempt, answer) in WORKED_EXAMPLES {
        messages.push(InferenceMessage::user(coach_turn(
            example_word,
            example_expected,
            example_attempt,
        )));
        messages.push(InferenceMessage::assistant(answer));
    }
    messages.push(InferenceMessage::user(coach_turn(word, expected, attempt)));
    messages
}

/// Feedback provider backed by a chat model
pub struct LlmFeedbackAdapter {
    engine: Arc<dyn InferenceEngine>,
    name: &'static str,
    max_tokens: u32,
}

impl std::fmt::Debug for LlmFeedbackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmFeedbackAdapter")
            .field("name", &self.name)
            .field("model", &self.engine.default_model())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LlmFeedbackAdapter {
    /// Wrap an inference engine under the given provider identifier
    pub fn new(engine: impl InferenceEngine + 'static, name: &'static str, max_tokens: u32) -> Self {
        Self {
            engine: Arc::new(engine),
            name,
            max_tokens,
        }
    }

    /// Send one throwaway request so the first learner does not pay for model loading
    ///
    /// Failures are logged and ignored.
    #[instrument(skip(self), fields(provider = self.name))]
    pub async fn warm_up(&self) {
        let (word, expected, attempt) = WARM_UP_CASE;
        let start = Instant::now();
        match self.coach(word, expected, attempt).await {
            Ok(_) => info!(elapsed = ?start.elapsed(), "Feedback model warmed up"),
            Err(e) => warn!(error = %e, "Feedback model warm-up failed, continuing"),
        }
    }

    async fn coach(&self, word: &str, expected: &str, attempt: &str) -> Result<String, InferenceError> {
        let request = InferenceRequest::from_messages(coach_messages(word, expected, attempt))
            .with_max_tokens(self.max_tokens);
        let response = self.engine.generate(request).await?;

        debug!(
            model = %response.model,
            usage = ?response.usage,
            "Feedback generated"
        );
        Ok(response.content.trim().to_string())
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            InferenceError::Timeout(timeout_ms) => ApplicationError::Timeout {
                operation: "generate_feedback".to_string(),
                timeout_ms,
            },
            other => ApplicationError::ModelFailure(other.to_string()),
        }
    }
}

#[async_trait]
impl FeedbackPort for LlmFeedbackAdapter {
    #[instrument(skip(self), fields(provider = self.name))]
    async fn generate_feedback(
        &self,
        word: &str,
        expected: &str,
        attempt: &str,
    ) -> Result<String, ApplicationError> {
        let feedback = self
            .coach(word, expected, attempt)
            .await
            .map_err(Self::map_error)?;

        if feedback.is_empty() {
            return Err(ApplicationError::ModelFailure(
                "Model returned empty feedback".to_string(),
            ));
        }
        Ok(feedback)
    }

    async fn is_available(&self) -> bool {
        self.engine.health_check().await.unwrap_or(false)
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
