//! Answer values and the append-only answer rows an audit accumulates.
//!
//! Editing an answer never updates a row in place. A new `AnswerRecord` is
//! appended and the most recent row per question becomes the current value.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{audit::AuditId, catalog::QuestionId};

/// Unique identifier of one answer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerId(pub uuid::Uuid);

impl AnswerId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AnswerId {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed set of answers an auditor can give to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Yes,
    No,
    /// Partially meets the standard.
    Regular,
    NotApplicable,
}

impl AnswerValue {
    pub const ALL: [AnswerValue; 4] = [
        AnswerValue::Yes,
        AnswerValue::No,
        AnswerValue::Regular,
        AnswerValue::NotApplicable,
    ];

    /// Parse free-form answer text. Trimmed and case-insensitive.
    ///
    /// Returns `None` for empty or unrecognized input.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "regular" => Some(Self::Regular),
            "not applicable" | "not_applicable" | "n/a" | "na" => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Display label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Regular => "Regular",
            Self::NotApplicable => "Not Applicable",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the auditor submits for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question_id: QuestionId,
    /// Raw answer text as entered; parsed with `AnswerValue::parse`.
    pub value: String,
    pub note: Option<String>,
    /// Reference to an uploaded file (path or object key).
    pub attachment: Option<String>,
}

impl AnswerInput {
    pub fn new(question_id: QuestionId, value: impl Into<String>) -> Self {
        Self {
            question_id,
            value: value.into(),
            note: None,
            attachment: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

/// One persisted answer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub audit_id: AuditId,
    pub question_id: QuestionId,
    /// Parsed value, `None` when `raw_value` was not recognized.
    pub value: Option<AnswerValue>,
    pub raw_value: String,
    /// Points derived from `value` when the row was written.
    pub points: f64,
    pub note: Option<String>,
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Insertion counter assigned by the backend. Breaks timestamp ties.
    #[serde(default)]
    pub sequence: u64,
}

impl AnswerRecord {
    /// Ordering key for "most recent wins".
    pub fn recency(&self) -> (DateTime<Utc>, u64) {
        (self.created_at, self.sequence)
    }
}
