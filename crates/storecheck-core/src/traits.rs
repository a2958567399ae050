//! Trait seams between the checklist logic and its environment.
//!
//! - `ChecklistBackend`: the persistence the session reads from and writes to
//! - `ScoringPolicy`   : point values and the completion/navigation knobs
//!
//! The session never talks to storage except through `ChecklistBackend`, and
//! it only uses the five operations below.

use std::sync::Arc;

use storecheck_contracts::{
    answer::{AnswerRecord, AnswerValue},
    audit::{Audit, AuditId},
    error::StorecheckResult,
    policy::{IncompletePolicy, RequiredRule},
};

/// Storage for audits and their answer rows.
///
/// Each call is a single request/response; implementations are expected to
/// be atomic per row and nothing more.
pub trait ChecklistBackend: Send + Sync {
    /// Fetch one audit. Missing audits are `StorecheckError::NotFound`.
    fn load_audit(&self, audit_id: AuditId) -> StorecheckResult<Audit>;

    /// Every answer row ever written for the audit, in any order.
    fn list_answers(&self, audit_id: AuditId) -> StorecheckResult<Vec<AnswerRecord>>;

    /// Append a new answer row and return it as stored.
    ///
    /// The backend assigns `sequence`; rows are never updated in place.
    fn append_answer(&self, record: AnswerRecord) -> StorecheckResult<AnswerRecord>;

    /// Overwrite the derived total score of an audit.
    fn update_audit_total(&self, audit_id: AuditId, total: f64) -> StorecheckResult<()>;

    /// Persist status, completion time, and signatory names of an audit.
    fn update_audit(&self, audit: &Audit) -> StorecheckResult<()>;
}

impl<T: ChecklistBackend + ?Sized> ChecklistBackend for Arc<T> {
    fn load_audit(&self, audit_id: AuditId) -> StorecheckResult<Audit> {
        (**self).load_audit(audit_id)
    }

    fn list_answers(&self, audit_id: AuditId) -> StorecheckResult<Vec<AnswerRecord>> {
        (**self).list_answers(audit_id)
    }

    fn append_answer(&self, record: AnswerRecord) -> StorecheckResult<AnswerRecord> {
        (**self).append_answer(record)
    }

    fn update_audit_total(&self, audit_id: AuditId, total: f64) -> StorecheckResult<()> {
        (**self).update_audit_total(audit_id, total)
    }

    fn update_audit(&self, audit: &Audit) -> StorecheckResult<()> {
        (**self).update_audit(audit)
    }
}

/// Scoring table plus the knobs that shape completion and navigation.
///
/// Implementations must be deterministic and cheap; the session calls
/// `points` once per submitted answer.
pub trait ScoringPolicy: Send + Sync {
    /// Point contribution of one answer value.
    fn points(&self, value: AnswerValue) -> f64;

    /// How required questions are picked within a section.
    fn required_rule(&self) -> RequiredRule {
        RequiredRule::Explicit
    }

    /// What leaving an incomplete section in edit mode does.
    fn incomplete_policy(&self) -> IncompletePolicy {
        IncompletePolicy::Block
    }
}
