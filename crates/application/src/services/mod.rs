//! Application services - Use case implementations

mod health_service;
mod pronunciation_service;
mod rule_based_feedback;

pub use health_service::{HealthService, ReadinessReport, ServiceHealth};
pub use pronunciation_service::{
    PERFECT_FEEDBACK, PronunciationConfig, PronunciationService, Providers, ScoredAttempt,
};
pub use rule_based_feedback::{PronunciationAnalysis, RuleBasedFeedback};
