//! # storecheck-core
//!
//! Scoring and completion logic for retail store audits.
//!
//! This crate provides:
//! - the answer scorer (`scoring`)
//! - the completion tracker (`completion`)
//! - the aggregator (`aggregate`)
//! - the navigation gate (`navigation`)
//! - `ChecklistSession`, which owns one audit's live state and wires the four
//!   together against a `ChecklistBackend` and a `ScoringPolicy`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storecheck_core::{ChecklistSession, scoring::DefaultPolicy};
//!
//! let mut session = ChecklistSession::open(audit_id, catalog, Box::new(DefaultPolicy), backend)?;
//! session.submit_answer(AnswerInput::new(QuestionId(1), "Yes"))?;
//! ```

pub mod aggregate;
pub mod completion;
pub mod navigation;
pub mod scoring;
pub mod session;
pub mod traits;

pub use session::{ChecklistSession, SubmitOutcome};
