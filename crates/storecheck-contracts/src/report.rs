//! Report types produced for a finished (or in-progress) audit.
//!
//! Rendering (PDF, spreadsheet, JSON) is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    audit::Audit,
    catalog::{QuestionId, SectionId},
    progress::CompletionState,
};

/// One current answer as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerLine {
    pub question_id: QuestionId,
    pub question: String,
    /// Display label of the answer, or the raw text when unrecognized.
    pub answer: String,
    pub points: f64,
    pub note: Option<String>,
    pub attachment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub section_id: SectionId,
    pub name: String,
    pub state: CompletionState,
    pub answered_required: usize,
    pub required_total: usize,
    pub subtotal: f64,
    pub answers: Vec<AnswerLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit: Audit,
    pub sections: Vec<SectionSummary>,
    pub total: f64,
    pub generated_at: DateTime<Utc>,
}

impl AuditReport {
    /// Sections that are not complete, in display order.
    pub fn pending_sections(&self) -> impl Iterator<Item = &SectionSummary> {
        self.sections
            .iter()
            .filter(|s| s.state != CompletionState::Complete)
    }
}
