//! Retail reference scenarios.
//!
//! Each scenario seeds its own in-memory backend, opens a real
//! `ChecklistSession`, and prints what happens at every step.

pub mod backend_outage;
pub mod full_audit;
pub mod navigation_gate;
pub mod revised_answer;

use storecheck_contracts::{audit::Audit, error::StorecheckResult};
use storecheck_core::ChecklistSession;
use storecheck_policy::{PolicyConfig, TomlScoringPolicy};

use crate::mock_data::RetailFixture;

/// Start an audit for the fixture's store and open a session on it.
pub(crate) fn open_session(
    fixture: &RetailFixture,
    config: &PolicyConfig,
) -> StorecheckResult<(Audit, ChecklistSession)> {
    let audit = fixture
        .backend
        .start_audit(fixture.store.id, fixture.auditor.id)?;
    let session = ChecklistSession::open(
        audit.id,
        fixture.backend.catalog()?,
        Box::new(TomlScoringPolicy::from_config(config.clone())?),
        Box::new(fixture.backend.clone()),
    )?;
    Ok((audit, session))
}
