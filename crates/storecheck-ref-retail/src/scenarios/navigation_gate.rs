//! Scenario 3: Navigation Gate
//!
//! The auditor answers one Storefront question and tries to move on, once
//! under each incomplete-section policy:
//!   - block: `next` and a direct jump are both refused with a warning
//!   - flag:  `next` moves on and Storefront is flagged incomplete; coming
//!            back from the untouched Sales Floor flags that section too
//!
//! Finally a completed section is shown read-only and re-opened for editing.

use storecheck_contracts::{
    answer::AnswerInput,
    catalog::SectionId,
    error::{StorecheckError, StorecheckResult},
    policy::IncompletePolicy,
    progress::{NavigationOutcome, ViewMode},
};
use storecheck_policy::PolicyConfig;

use crate::{mock_data::seed, scenarios::open_session};

/// What each navigation attempt produced.
#[derive(Debug, Clone)]
pub struct GateRun {
    pub next: NavigationOutcome,
    pub jump: NavigationOutcome,
    pub flagged: Vec<SectionId>,
}

/// Answer one question of the first section, then try `next` and a jump to
/// the last section under `policy`.
pub fn run_gate(config: &PolicyConfig, policy: IncompletePolicy) -> StorecheckResult<GateRun> {
    let mut config = config.clone();
    config.navigation.on_incomplete = policy;

    let fixture = seed()?;
    let (_, mut session) = open_session(&fixture, &config)?;

    let first = session.active_section();
    let last = session
        .catalog()
        .sections()
        .last()
        .map(|s| s.id)
        .ok_or_else(|| StorecheckError::validation("reference checklist is empty"))?;
    let question = session
        .section_progress(first)?
        .missing
        .first()
        .copied()
        .ok_or_else(|| StorecheckError::validation("first section has no required question"))?;

    session.submit_answer(AnswerInput::new(question, "Yes"))?;

    let next = session.next();
    if next.moved() {
        // Come back so the jump starts from the same half-answered section.
        session.switch_to(first)?;
    }
    let jump = session.switch_to(last)?;

    Ok(GateRun {
        next,
        jump,
        flagged: session.flagged_sections().iter().copied().collect(),
    })
}

/// Complete the first section, leave it, and toggle its view mode.
pub fn run_view_toggle(config: &PolicyConfig) -> StorecheckResult<(ViewMode, ViewMode)> {
    let fixture = seed()?;
    let (_, mut session) = open_session(&fixture, config)?;

    let first = session.active_section();
    for question in session.section_progress(first)?.missing {
        session.submit_answer(AnswerInput::new(question, "Yes"))?;
    }
    session.next();

    let after_leaving = session.mode(first);
    session.edit_section(first)?;
    Ok((after_leaving, session.mode(first)))
}

fn describe(outcome: &NavigationOutcome) -> String {
    match outcome {
        NavigationOutcome::Moved { to, flagged_incomplete: Some(flag), .. } => {
            format!("MOVED to section {to}, section {flag} flagged incomplete")
        }
        NavigationOutcome::Moved { to, .. } => format!("MOVED to section {to}"),
        NavigationOutcome::Blocked { warning, .. } => format!("BLOCKED: {warning}"),
        NavigationOutcome::Stayed { section } => format!("STAYED on section {section}"),
        NavigationOutcome::AtBoundary { section } => format!("AT BOUNDARY on section {section}"),
    }
}

/// Run Scenario 3.
pub fn run_scenario(config: &PolicyConfig) -> StorecheckResult<()> {
    println!("=== Scenario 3: Navigation Gate ===");
    println!();

    for policy in [IncompletePolicy::Block, IncompletePolicy::Flag] {
        let run = run_gate(config, policy)?;
        println!("  Policy: {:?}", policy);
        println!("    next         -> {}", describe(&run.next));
        println!("    jump to last -> {}", describe(&run.jump));
        println!("    flagged      -> {:?}", run.flagged);
        println!();
    }

    let (after_leaving, after_toggle) = run_view_toggle(config)?;
    println!("  Completed Storefront after leaving:  {:?}", after_leaving);
    println!("  After the auditor re-opens it:       {:?}", after_toggle);
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
