//! TOML-driven scoring policy.
//!
//! `TomlScoringPolicy` loads a `PolicyConfig` from a TOML string or file and
//! implements the `ScoringPolicy` trait from storecheck-core.

use std::path::Path;

use tracing::debug;

use storecheck_contracts::{
    answer::AnswerValue,
    error::{StorecheckError, StorecheckResult},
    policy::{IncompletePolicy, RequiredRule},
};
use storecheck_core::traits::ScoringPolicy;

use crate::rule::PolicyConfig;

/// A `ScoringPolicy` read from a TOML document.
///
/// ```rust,ignore
/// use storecheck_policy::engine::TomlScoringPolicy;
///
/// let policy = TomlScoringPolicy::from_file(Path::new("policies/retail.toml"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlScoringPolicy {
    config: PolicyConfig,
}

impl TomlScoringPolicy {
    /// Parse `s` as TOML and build a policy.
    ///
    /// Returns `StorecheckError::ConfigError` if the TOML is malformed, has
    /// unknown keys, or assigns a non-finite point value.
    pub fn from_toml_str(s: &str) -> StorecheckResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| StorecheckError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a TOML policy.
    pub fn from_file(path: &Path) -> StorecheckResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StorecheckError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_config(config: PolicyConfig) -> StorecheckResult<Self> {
        for value in AnswerValue::ALL {
            let points = config.points.get(value);
            if !points.is_finite() {
                return Err(StorecheckError::ConfigError {
                    reason: format!("points for '{}' must be a finite number, got {}", value, points),
                });
            }
        }

        debug!(
            on_incomplete = ?config.navigation.on_incomplete,
            required = ?config.completion.required,
            "scoring policy loaded"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

impl ScoringPolicy for TomlScoringPolicy {
    fn points(&self, value: AnswerValue) -> f64 {
        self.config.points.get(value)
    }

    fn required_rule(&self) -> RequiredRule {
        self.config.completion.rule()
    }

    fn incomplete_policy(&self) -> IncompletePolicy {
        self.config.navigation.on_incomplete
    }
}
