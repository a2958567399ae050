//! # storecheck-ref-retail
//!
//! Retail reference checklist for the storecheck audit engine.
//!
//! Demonstrates four audit scenarios using mock data:
//!
//! 1. **Full Audit**: a visit answered section by section, signed off and
//!    completed, with the total reproduced after a reload.
//! 2. **Revised Answer**: an answer revised once; only the latest row counts.
//! 3. **Navigation Gate**: leaving a half-answered section under the block
//!    and flag policies.
//! 4. **Backend Outage**: a failed write leaves the session untouched.
//!
//! All data is hardcoded and fictional.

pub mod mock_data;
pub mod scenarios;

use storecheck_contracts::error::StorecheckResult;
use storecheck_policy::{PolicyConfig, TomlScoringPolicy};

/// Embedded default policy for the reference checklist.
pub const RETAIL_POLICY: &str = include_str!("../policies/retail.toml");

/// Parse the embedded default policy.
pub fn default_policy() -> StorecheckResult<PolicyConfig> {
    Ok(TomlScoringPolicy::from_toml_str(RETAIL_POLICY)?.config().clone())
}
