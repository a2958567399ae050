//! The navigation gate.
//!
//! Decides whether the auditor may leave the active section. Moving is always
//! allowed unless the source section still has unanswered required questions
//! and is in edit mode, in which case the configured `IncompletePolicy`
//! decides. An untouched section counts as unanswered.

use storecheck_contracts::{
    catalog::SectionId,
    policy::IncompletePolicy,
    progress::{NavigationOutcome, SectionProgress, ViewMode},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationGate {
    policy: IncompletePolicy,
}

impl NavigationGate {
    pub fn new(policy: IncompletePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> IncompletePolicy {
        self.policy
    }

    /// Evaluate a move from the section described by `from` to `to`.
    pub fn evaluate(&self, from: &SectionProgress, mode: ViewMode, to: SectionId) -> NavigationOutcome {
        let source = from.section_id;
        if source == to {
            return NavigationOutcome::Stayed { section: source };
        }

        let gated = !from.missing.is_empty() && mode == ViewMode::Edit;
        if !gated {
            return NavigationOutcome::Moved {
                from: source,
                to,
                flagged_incomplete: None,
            };
        }

        match self.policy {
            IncompletePolicy::Block => NavigationOutcome::Blocked {
                section: source,
                warning: format!(
                    "section {} has {} unanswered required question(s); answer them before leaving",
                    source,
                    from.missing.len()
                ),
                missing: from.missing.clone(),
            },
            IncompletePolicy::Flag => NavigationOutcome::Moved {
                from: source,
                to,
                flagged_incomplete: Some(source),
            },
        }
    }
}
