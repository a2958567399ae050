//! Scenario 2: Revised Answer
//!
//! The auditor first marks the facade as clean, then walks outside again and
//! changes the answer to "No". Both rows stay in storage; only the later one
//! counts toward the total, both in the live session and after reopening.

use storecheck_contracts::{
    answer::{AnswerInput, AnswerValue},
    error::{StorecheckError, StorecheckResult},
};
use storecheck_core::ChecklistSession;
use storecheck_policy::{PolicyConfig, TomlScoringPolicy};

use crate::{mock_data::seed, scenarios::open_session};

/// Totals observed during the scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionTotals {
    pub after_first: f64,
    pub after_revision: f64,
    pub after_reopen: f64,
    pub stored_rows: usize,
}

pub fn run_revision(config: &PolicyConfig) -> StorecheckResult<RevisionTotals> {
    let fixture = seed()?;
    let (audit, mut session) = open_session(&fixture, config)?;

    let facade = session
        .catalog()
        .sections()
        .first()
        .and_then(|s| session.catalog().questions_in(s.id).first())
        .map(|q| q.id)
        .ok_or_else(|| StorecheckError::validation("reference checklist is empty"))?;

    let after_first = session
        .submit_answer(AnswerInput::new(facade, AnswerValue::Yes.label()))?
        .total;
    let after_revision = session
        .submit_answer(
            AnswerInput::new(facade, AnswerValue::No.label()).with_note("Graffiti on the side wall"),
        )?
        .total;

    let reopened = ChecklistSession::open(
        audit.id,
        fixture.backend.catalog()?,
        Box::new(TomlScoringPolicy::from_config(config.clone())?),
        Box::new(fixture.backend.clone()),
    )?;

    Ok(RevisionTotals {
        after_first,
        after_revision,
        after_reopen: reopened.total(),
        stored_rows: fixture.backend.answer_rows(audit.id)?.len(),
    })
}

/// Run Scenario 2.
pub fn run_scenario(config: &PolicyConfig) -> StorecheckResult<()> {
    println!("=== Scenario 2: Revised Answer ===");
    println!();

    let totals = run_revision(config)?;

    println!("  Facade answered \"Yes\"     -> total {:.1}", totals.after_first);
    println!("  Facade revised to \"No\"    -> total {:.1}", totals.after_revision);
    println!("  Session reopened           -> total {:.1}", totals.after_reopen);
    println!("  Answer rows in storage:       {}", totals.stored_rows);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_policy;

    #[test]
    fn only_latest_answer_counts() {
        let totals = run_revision(&default_policy().unwrap()).unwrap();
        assert_eq!(
            totals,
            RevisionTotals {
                after_first: 1.0,
                after_revision: -1.0,
                after_reopen: -1.0,
                stored_rows: 2,
            }
        );
    }
}
