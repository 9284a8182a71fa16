//! Character-level similarity score

use liblevenshtein::distance::standard_distance;

use crate::value_objects::Score;

/// Levenshtein distance between two strings, counted in Unicode scalar
/// values
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    standard_distance(a, b)
}

/// Similarity of `attempt` to `reference` in `[0, 1]`
///
/// Both strings are trimmed. An empty reference scores 0.0.
#[allow(clippy::cast_precision_loss)]
pub fn score(reference: &str, attempt: &str) -> Score {
    let reference = reference.trim();
    let attempt = attempt.trim();
    if reference.is_empty() {
        return Score::ZERO;
    }
    let longest = reference.chars().count().max(attempt.chars().count());
    let distance = levenshtein_distance(reference, attempt);
    Score::clamped(1.0 - distance as f64 / longest as f64)
}
