//! Feedback report produced for a single scoring request

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::PhonemeToken;

/// Classification of a pronunciation mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The learner produced a different phoneme
    Substitution,
    /// The learner produced an extra phoneme
    Insertion,
    /// The learner skipped an expected phoneme
    Deletion,
}

/// A single mismatch between the expected and produced sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationIssue {
    /// Kind of mismatch
    pub kind: IssueKind,
    /// Expected phoneme (absent for insertions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<PhonemeToken>,
    /// Produced phoneme (absent for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced: Option<PhonemeToken>,
    /// Index in the expected sequence (absent for insertions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_index: Option<usize>,
    /// Index in the produced sequence (absent for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced_index: Option<usize>,
}

impl PronunciationIssue {
    /// A substituted phoneme
    #[must_use]
    pub fn substitution(
        expected_index: usize,
        expected: PhonemeToken,
        produced_index: usize,
        produced: PhonemeToken,
    ) -> Self {
        Self {
            kind: IssueKind::Substitution,
            expected: Some(expected),
            produced: Some(produced),
            expected_index: Some(expected_index),
            produced_index: Some(produced_index),
        }
    }

    /// An extra phoneme
    #[must_use]
    pub fn insertion(produced_index: usize, produced: PhonemeToken) -> Self {
        Self {
            kind: IssueKind::Insertion,
            expected: None,
            produced: Some(produced),
            expected_index: None,
            produced_index: Some(produced_index),
        }
    }

    /// A missed phoneme
    #[must_use]
    pub fn deletion(expected_index: usize, expected: PhonemeToken) -> Self {
        Self {
            kind: IssueKind::Deletion,
            expected: Some(expected),
            produced: None,
            expected_index: Some(expected_index),
            produced_index: None,
        }
    }
}

/// Coaching feedback for one attempt
///
/// Always holds at least one line. A report without issues carries a single
/// positive line and no summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Leading summary, present when there is something to fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// One line per issue, in alignment order
    pub lines: Vec<String>,
    /// Structured issues backing `lines`
    #[serde(default)]
    pub issues: Vec<PronunciationIssue>,
}

impl FeedbackReport {
    /// A report with a single positive-reinforcement line
    #[must_use]
    pub fn positive(line: impl Into<String>) -> Self {
        Self {
            summary: None,
            lines: vec![line.into()],
            issues: Vec::new(),
        }
    }

    /// A report describing one or more issues
    #[must_use]
    pub fn with_issues(
        summary: impl Into<String>,
        issues: Vec<PronunciationIssue>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            summary: Some(summary.into()),
            lines,
            issues,
        }
    }

    /// Whether the attempt needed no correction
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.issues.is_empty()
    }

    /// Render as newline-separated text, summary first
    #[must_use]
    pub fn render(&self) -> String {
        self.summary
            .iter()
            .chain(self.lines.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> PhonemeToken {
        PhonemeToken::new(s).unwrap()
    }

    #[test]
    fn positive_report_has_single_line() {
        let report = FeedbackReport::positive("Great!");
        assert!(report.is_positive());
        assert!(report.summary.is_none());
        assert_eq!(report.render(), "Great!");
    }

    #[test]
    fn render_puts_summary_first() {
        let report = FeedbackReport::with_issues(
            "Summary",
            vec![PronunciationIssue::insertion(2, token("n"))],
            vec!["one".to_string(), "two".to_string()],
        );
        assert!(!report.is_positive());
        assert_eq!(report.render(), "Summary\none\ntwo");
        assert_eq!(report.to_string(), report.render());
    }

    #[test]
    fn issue_constructors_set_indices() {
        let sub = PronunciationIssue::substitution(1, token("ɛ"), 1, token("u"));
        assert_eq!(sub.kind, IssueKind::Substitution);
        assert_eq!(sub.expected_index, Some(1));

        let del = PronunciationIssue::deletion(3, token("ʁ"));
        assert!(del.produced.is_none());
        assert!(del.produced_index.is_none());
    }

    #[test]
    fn issue_serialization_skips_absent_sides() {
        let ins = PronunciationIssue::insertion(0, token("n"));
        let json = serde_json::to_string(&ins).unwrap();
        assert!(json.contains(r#""kind":"insertion""#));
        assert!(!json.contains("expected"));
    }
}
