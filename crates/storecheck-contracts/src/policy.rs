//! Policy knobs shared by the core components and the TOML policy loader.

use serde::{Deserialize, Serialize};

/// How the required questions of a section are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RequiredRule {
    /// Use each question's `required` flag.
    Explicit,
    /// Every question except the last `optional_tail` positions is required.
    Positional { optional_tail: usize },
}

impl RequiredRule {
    /// The historical convention: the last two questions of every section
    /// hold notes and photo evidence and are optional.
    pub const LEGACY: RequiredRule = RequiredRule::Positional { optional_tail: 2 };
}

impl Default for RequiredRule {
    fn default() -> Self {
        Self::Explicit
    }
}

/// What happens when an auditor leaves a section in edit mode while some
/// of its required questions are still unanswered.
///
/// Applied identically to direct section switches and to next/previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompletePolicy {
    /// Refuse the move and warn the auditor.
    Block,
    /// Allow the move and flag the section as incomplete.
    Flag,
}

impl Default for IncompletePolicy {
    fn default() -> Self {
        Self::Block
    }
}
