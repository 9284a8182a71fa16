//! Domain layer for Prononce
//!
//! Contains the phonetic core of the pronunciation tutor: phoneme tokens,
//! sequence alignment, the confusion rule tables, the diff-to-feedback
//! translator and the similarity scorer.
//! This layer performs no I/O and every operation is a pure function of its inputs.

pub mod entities;
pub mod errors;
pub mod phonetics;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use phonetics::{
    AlignmentOp, align, build_feedback, example_for, levenshtein_distance, rule_for, score,
};
pub use value_objects::*;
