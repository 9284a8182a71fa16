//! Feedback port - Interface for coaching text generation

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for generating coaching feedback from a word and two transcriptions
///
/// Implementations range from the deterministic rule engine to
/// language-model backed coaches.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedbackPort: Send + Sync {
    /// Generate feedback for a learner's attempt
    ///
    /// # Arguments
    /// * `word` - The target word or sentence
    /// * `expected` - Reference phonemes
    /// * `attempt` - Phonemes recognized from the learner
    async fn generate_feedback(
        &self,
        word: &str,
        expected: &str,
        attempt: &str,
    ) -> Result<String, ApplicationError>;

    /// Check if the feedback provider can currently be used
    async fn is_available(&self) -> bool;

    /// Provider identifier used in logs and readiness reports
    fn provider_name(&self) -> &'static str;
}
