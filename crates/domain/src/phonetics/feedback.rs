//! Turns a phoneme alignment into coaching lines

use super::alignment::{AlignmentOp, align};
use super::rules::{example_for, rule_for};
use crate::entities::{FeedbackReport, PronunciationIssue};
use crate::value_objects::{PhonemeSequence, PhonemeToken};

/// Hint used when a substitution has no specific rule
pub const GENERIC_SUBSTITUTION: &str =
    "Adjust this sound toward the French target. Repeat slowly and compare with a native speaker.";

/// Hint for any extra phoneme
pub const GENERIC_INSERTION: &str =
    "You added an extra sound. Keep it smooth and avoid inserting this phone.";

/// Hint for any missed phoneme
pub const GENERIC_DELETION: &str = "You skipped a sound. Repeat slowly and pronounce each phone.";

/// Build rule-based feedback for an attempt at `word`
///
/// `expected` and `attempt` are raw, space-separated phoneme strings. The
/// result always holds at least one line: a single positive line when the
/// sequences align without edits, otherwise a summary followed by one line
/// per issue in left-to-right order.
#[must_use]
pub fn build_feedback(word: &str, expected: &str, attempt: &str) -> FeedbackReport {
    let expected = PhonemeSequence::parse(expected);
    let produced = PhonemeSequence::parse(attempt);
    let word = word.trim();

    let ops = align(&expected, &produced);
    if ops.iter().all(AlignmentOp::is_equal) {
        return FeedbackReport::positive(format!(
            "Great! Your pronunciation of “{word}” is very close. 👏"
        ));
    }

    let (issues, lines): (Vec<_>, Vec<_>) = ops.into_iter().filter_map(describe).unzip();
    FeedbackReport::with_issues(
        format!(
            "Let's improve “{word}”. Focus on the highlighted sounds below. \
             Use the English-style hints and repeat slowly."
        ),
        issues,
        lines,
    )
}

fn describe(op: AlignmentOp) -> Option<(PronunciationIssue, String)> {
    match op {
        AlignmentOp::Equal { .. } => None,
        AlignmentOp::Substitute {
            expected_index,
            expected,
            produced_index,
            produced,
        } => {
            let line = substitution_line(&expected, &produced);
            Some((
                PronunciationIssue::substitution(expected_index, expected, produced_index, produced),
                line,
            ))
        },
        AlignmentOp::Insert {
            produced_index,
            produced,
        } => {
            let line = format!("Extra sound {produced} → {GENERIC_INSERTION}");
            Some((PronunciationIssue::insertion(produced_index, produced), line))
        },
        AlignmentOp::Delete {
            expected_index,
            expected,
        } => {
            let line = with_example(
                format!("Missed {expected} → {GENERIC_DELETION}"),
                example_for(expected.as_str()),
            );
            Some((PronunciationIssue::deletion(expected_index, expected), line))
        },
    }
}

fn substitution_line(expected: &PhonemeToken, produced: &PhonemeToken) -> String {
    let hint = rule_for(expected.as_str(), produced.as_str());
    let example = example_for(expected.as_str()).or_else(|| example_for(produced.as_str()));
    with_example(format!("Replace {produced} with {expected} → {hint}"), example)
}

fn with_example(mut line: String, example: Option<&str>) -> String {
    if let Some(example) = example {
        line.push_str(&format!(" Example: {example}."));
    }
    line
}
