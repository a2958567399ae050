//! Policy document schema.
//!
//! A `PolicyConfig` is deserialized from TOML. Every table and every key is
//! optional; anything left out falls back to the standard scoring table,
//! explicit required flags, and blocking navigation.
//!
//! ```toml
//! [points]
//! yes = 1.0
//! no = -1.0
//! regular = 0.5
//! not_applicable = 0.0
//!
//! [navigation]
//! on_incomplete = "block"
//!
//! [completion]
//! required = "positional"
//! optional_tail = 2
//! ```

use serde::{Deserialize, Serialize};

use storecheck_contracts::{
    answer::AnswerValue,
    policy::{IncompletePolicy, RequiredRule},
};

/// Points per answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointsTable {
    #[serde(default = "default_yes")]
    pub yes: f64,
    #[serde(default = "default_no")]
    pub no: f64,
    #[serde(default = "default_regular")]
    pub regular: f64,
    #[serde(default)]
    pub not_applicable: f64,
}

fn default_yes() -> f64 {
    1.0
}

fn default_no() -> f64 {
    -1.0
}

fn default_regular() -> f64 {
    0.5
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            yes: default_yes(),
            no: default_no(),
            regular: default_regular(),
            not_applicable: 0.0,
        }
    }
}

impl PointsTable {
    pub fn get(&self, value: AnswerValue) -> f64 {
        match value {
            AnswerValue::Yes => self.yes,
            AnswerValue::No => self.no,
            AnswerValue::Regular => self.regular,
            AnswerValue::NotApplicable => self.not_applicable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationConfig {
    #[serde(default)]
    pub on_incomplete: IncompletePolicy,
}

/// Which rule selects required questions, as written in TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredMode {
    #[default]
    Explicit,
    Positional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    #[serde(default)]
    pub required: RequiredMode,
    /// Number of trailing optional questions under the positional rule.
    #[serde(default = "default_optional_tail")]
    pub optional_tail: usize,
}

fn default_optional_tail() -> usize {
    2
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            required: RequiredMode::Explicit,
            optional_tail: default_optional_tail(),
        }
    }
}

impl CompletionConfig {
    pub fn rule(&self) -> RequiredRule {
        match self.required {
            RequiredMode::Explicit => RequiredRule::Explicit,
            RequiredMode::Positional => RequiredRule::Positional {
                optional_tail: self.optional_tail,
            },
        }
    }
}

/// The top-level structure deserialized from a TOML policy file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub points: PointsTable,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}
