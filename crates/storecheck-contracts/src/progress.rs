//! Completion and navigation results reported by the checklist session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{QuestionId, SectionId};

/// Completion state of one section.
///
/// `Complete` and `Incomplete` are mutually exclusive; a section with no
/// answered required question is `Untouched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Untouched,
    Incomplete,
    Complete,
}

impl CompletionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Untouched => "untouched",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for CompletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section_id: SectionId,
    pub state: CompletionState,
    pub answered_required: usize,
    pub required_total: usize,
    /// Required questions without a current answer, in display order.
    pub missing: Vec<QuestionId>,
}

impl SectionProgress {
    pub fn is_complete(&self) -> bool {
        self.state == CompletionState::Complete
    }
}

/// Whether a section is shown read-only or editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Edit,
    View,
}

/// The result of asking to move the active section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum NavigationOutcome {
    /// The active section changed.
    Moved {
        from: SectionId,
        to: SectionId,
        /// Set when the source was left incomplete under the flag policy.
        flagged_incomplete: Option<SectionId>,
    },
    /// Target equals source; nothing happened.
    Stayed { section: SectionId },
    /// The move was refused because the source has unanswered required
    /// questions.
    Blocked {
        section: SectionId,
        warning: String,
        missing: Vec<QuestionId>,
    },
    /// `next` on the last section or `previous` on the first.
    AtBoundary { section: SectionId },
}

impl NavigationOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}
