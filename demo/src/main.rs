//! storecheck: Retail Reference Demo CLI
//!
//! Runs one or all of the reference audit scenarios against an in-memory
//! backend, prints a full audit report, or scores a single answer.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- full-audit
//!   cargo run -p demo -- navigation-gate
//!   cargo run -p demo -- report --json
//!   cargo run -p demo -- --policy my-policy.toml score "Regular"

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storecheck_contracts::{
    error::{StorecheckError, StorecheckResult},
    report::AuditReport,
};
use storecheck_core::{scoring, traits::ScoringPolicy};
use storecheck_policy::{PolicyConfig, TomlScoringPolicy};
use storecheck_ref_retail::{
    default_policy,
    scenarios::{backend_outage, full_audit, navigation_gate, revised_answer},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// storecheck: retail store-audit scoring demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "storecheck retail reference demo",
    long_about = "Runs storecheck reference scenarios showing answer scoring,\n\
                  section completion, navigation gating, and audit reports."
)]
struct Cli {
    /// Scoring policy TOML. Defaults to the embedded retail policy.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: answer the whole checklist and complete the audit.
    FullAudit,
    /// Scenario 2: revise an answer; only the latest row counts.
    RevisedAnswer,
    /// Scenario 3: leave a half-answered section under block and flag policies.
    NavigationGate,
    /// Scenario 4: a write fails while the backend is down.
    BackendOutage,
    /// Run the full audit and print its report.
    Report {
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the points an answer is worth under the active policy.
    Score {
        /// Answer text, e.g. "Yes", "No", "Regular", "Not Applicable".
        value: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_policy(cli.policy.as_ref()).and_then(|config| match cli.command {
        Command::RunAll => run_all(&config),
        Command::FullAudit => full_audit::run_scenario(&config),
        Command::RevisedAnswer => revised_answer::run_scenario(&config),
        Command::NavigationGate => navigation_gate::run_scenario(&config),
        Command::BackendOutage => backend_outage::run_scenario(&config),
        Command::Report { json } => print_report(&config, json),
        Command::Score { value } => print_score(&config, &value),
    });

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_policy(path: Option<&PathBuf>) -> StorecheckResult<PolicyConfig> {
    match path {
        Some(path) => Ok(TomlScoringPolicy::from_file(path)?.config().clone()),
        None => default_policy(),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all(config: &PolicyConfig) -> StorecheckResult<()> {
    print_banner();
    full_audit::run_scenario(config)?;
    revised_answer::run_scenario(config)?;
    navigation_gate::run_scenario(config)?;
    backend_outage::run_scenario(config)?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn print_report(config: &PolicyConfig, json: bool) -> StorecheckResult<()> {
    let report = full_audit::run_audit(config)?;
    if json {
        println!("{}", report_json(&report)?);
    } else {
        print_report_text(&report);
    }
    Ok(())
}

fn report_json(report: &AuditReport) -> StorecheckResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| StorecheckError::validation(format!("could not serialize report: {e}")))
}

fn print_report_text(report: &AuditReport) {
    println!("Audit {}  [{}]", report.audit.id, report.audit.status);
    println!("Generated {}", report.generated_at.format("%Y-%m-%d %H:%M UTC"));
    println!();
    for section in &report.sections {
        println!(
            "{}  ({}/{} required, subtotal {:.1}, {})",
            section.name,
            section.answered_required,
            section.required_total,
            section.subtotal,
            section.state
        );
        for line in &section.answers {
            println!("  {:<52} {:<15} {:>5.1}", line.question, line.answer, line.points);
            if let Some(note) = &line.note {
                println!("      note: {note}");
            }
        }
        println!();
    }
    println!("Total score: {:.1}", report.total);
}

fn print_score(config: &PolicyConfig, value: &str) -> StorecheckResult<()> {
    let policy = TomlScoringPolicy::from_config(config.clone())?;
    let points = scoring::score_raw_with(&policy as &dyn ScoringPolicy, value);
    println!("{value:?} scores {points:+.1}");
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("storecheck: Retail Store Audit Engine");
    println!("Reference Demo");
    println!("======================================");
    println!();
    println!("Per answer:");
    println!("  [1] Answer parsed and scored (Yes +1, No -1, Regular +0.5, N/A 0)");
    println!("  [2] New row appended; the most recent row per question wins");
    println!("  [3] Section completion recomputed from required questions");
    println!("  [4] Audit total recomputed and written back");
    println!("Per move:");
    println!("  [5] Navigation gate checks the section being left");
    println!();
}
