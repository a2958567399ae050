//! # storecheck-policy
//!
//! A TOML-driven scoring policy for storecheck audits.
//!
//! ## Overview
//!
//! This crate provides [`TomlScoringPolicy`], which implements the
//! [`ScoringPolicy`](storecheck_core::traits::ScoringPolicy) trait. A policy
//! document sets the points per answer value, the rule that picks required
//! questions, and what happens when an auditor leaves an incomplete section.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use storecheck_policy::engine::TomlScoringPolicy;
//!
//! let policy = TomlScoringPolicy::from_file(Path::new("policies/retail.toml"))?;
//! // Pass `policy` to `storecheck_core::ChecklistSession::open(...)`.
//! ```

pub mod engine;
pub mod rule;

pub use engine::TomlScoringPolicy;
pub use rule::{CompletionConfig, NavigationConfig, PointsTable, PolicyConfig, RequiredMode};

// ── Tests ─────────────────────────────────────────────────────────────────────
