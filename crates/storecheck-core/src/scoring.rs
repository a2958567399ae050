//! The answer scorer: a static lookup from answer value to points.

use storecheck_contracts::answer::AnswerValue;

use crate::traits::ScoringPolicy;

/// Points for an answer under the standard table.
///
/// | answer          | points |
/// |-----------------|--------|
/// | Yes             | +1.0   |
/// | No              | -1.0   |
/// | Regular         | +0.5   |
/// | Not Applicable  |  0.0   |
pub const fn score(value: AnswerValue) -> f64 {
    match value {
        AnswerValue::Yes => 1.0,
        AnswerValue::No => -1.0,
        AnswerValue::Regular => 0.5,
        AnswerValue::NotApplicable => 0.0,
    }
}

/// Score raw answer text. Empty or unrecognized input is worth 0.
pub fn score_raw(raw: &str) -> f64 {
    AnswerValue::parse(raw).map(score).unwrap_or(0.0)
}

/// Score raw answer text under an arbitrary policy.
pub fn score_raw_with(policy: &dyn ScoringPolicy, raw: &str) -> f64 {
    AnswerValue::parse(raw)
        .map(|v| policy.points(v))
        .unwrap_or(0.0)
}

/// The standard table with explicit required flags and blocking navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl ScoringPolicy for DefaultPolicy {
    fn points(&self, value: AnswerValue) -> f64 {
        score(value)
    }
}
