//! Scenario 4: Backend Outage
//!
//! The connection drops while the auditor is mid-section. The failed write is
//! reported and the session keeps exactly what the backend has; once the
//! backend is back the same answer goes through.

use storecheck_contracts::{
    answer::AnswerInput,
    error::{StorecheckError, StorecheckResult},
};
use storecheck_policy::PolicyConfig;

use crate::{mock_data::seed, scenarios::open_session};

#[derive(Debug, Clone, PartialEq)]
pub struct OutageRun {
    pub total_before: f64,
    /// Display text of the error returned during the outage.
    pub error: String,
    pub total_during: f64,
    pub total_after_recovery: f64,
}

pub fn run_outage(config: &PolicyConfig) -> StorecheckResult<OutageRun> {
    let fixture = seed()?;
    let (_, mut session) = open_session(&fixture, config)?;

    let missing = session.section_progress(session.active_section())?.missing;
    let (first, second) = match missing.as_slice() {
        [a, b, ..] => (*a, *b),
        _ => {
            return Err(StorecheckError::validation(
                "first section needs two required questions",
            ))
        }
    };

    let total_before = session.submit_answer(AnswerInput::new(first, "Yes"))?.total;

    fixture.backend.set_unavailable(true);
    let error = match session.submit_answer(AnswerInput::new(second, "Regular")) {
        Err(e @ StorecheckError::Backend { .. }) => e.to_string(),
        Err(other) => return Err(other),
        Ok(_) => {
            return Err(StorecheckError::validation(
                "write succeeded while the backend was down",
            ))
        }
    };
    let total_during = session.total();

    fixture.backend.set_unavailable(false);
    let total_after_recovery = session
        .submit_answer(AnswerInput::new(second, "Regular"))?
        .total;

    Ok(OutageRun {
        total_before,
        error,
        total_during,
        total_after_recovery,
    })
}

/// Run Scenario 4.
pub fn run_scenario(config: &PolicyConfig) -> StorecheckResult<()> {
    println!("=== Scenario 4: Backend Outage ===");
    println!();

    let run = run_outage(config)?;

    println!("  Before outage:     total {:.1}", run.total_before);
    println!("  During outage:     {}", run.error);
    println!("                     total unchanged at {:.1}", run.total_during);
    println!("  After recovery:    total {:.1}", run.total_after_recovery);
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
