//! Rule-based feedback provider
//!
//! Wraps the domain's diff-to-feedback translator behind the `FeedbackPort`.

use async_trait::async_trait;
use domain::{FeedbackReport, Score, build_feedback, score};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::FeedbackPort;

/// Structured result of the rule engine plus the similarity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PronunciationAnalysis {
    /// Coaching report, summary first
    pub report: FeedbackReport,
    /// Character-level similarity between expected and attempt
    pub score: Score,
}

/// Deterministic feedback from the confusion rule tables
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedFeedback;

impl RuleBasedFeedback {
    /// Create the provider
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run the rule engine and the scorer on one attempt
    #[must_use]
    pub fn analyze(word: &str, expected: &str, attempt: &str) -> PronunciationAnalysis {
        PronunciationAnalysis {
            report: build_feedback(word, expected, attempt),
            score: score(expected, attempt),
        }
    }
}

#[async_trait]
impl FeedbackPort for RuleBasedFeedback {
    #[instrument(skip(self))]
    async fn generate_feedback(
        &self,
        word: &str,
        expected: &str,
        attempt: &str,
    ) -> Result<String, ApplicationError> {
        let report = build_feedback(word, expected, attempt);
        debug!(issues = report.issues.len(), "Rule-based feedback generated");
        Ok(report.render())
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "rule-based"
    }
}
