//! Domain entities

mod feedback_report;

pub use feedback_report::{FeedbackReport, IssueKind, PronunciationIssue};
