//! Adapters bridging the provider crates to application ports

mod llm_feedback_adapter;
mod speech_adapter;

pub use llm_feedback_adapter::{COACH_SYSTEM_PROMPT, LlmFeedbackAdapter, coach_messages};
pub use speech_adapter::{PhonemizerAdapter, RecognizerAdapter, SynthesisAdapter};
