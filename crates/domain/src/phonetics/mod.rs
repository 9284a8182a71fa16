//! Phonetic analysis: alignment, rule tables, feedback and scoring
//!
//! Everything here is synchronous, allocation-light and free of shared
//! mutable state, so it can be called concurrently from any number of
//! request handlers.

mod alignment;
mod feedback;
mod rules;
mod scoring;

pub use alignment::{AlignmentOp, align};
pub use feedback::{GENERIC_DELETION, GENERIC_INSERTION, GENERIC_SUBSTITUTION, build_feedback};
pub use rules::{ConfusionRule, EXAMPLES, ExampleEntry, RULES, example_for, rule_for, specific_rule_for};
pub use scoring::{levenshtein_distance, score};
