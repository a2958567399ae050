//! In-memory implementation of `ChecklistBackend`.
//!
//! `InMemoryBackend` keeps every table in `Vec`s behind an `Arc<Mutex<_>>`, so
//! a clone of the backend can be handed to a `ChecklistSession` while the
//! caller keeps another for administration and inspection.
//!
//! Answer rows are append-only. Each row gets a backend-assigned `sequence`
//! that increases by one per insert across all audits.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use storecheck_contracts::{
    answer::AnswerRecord,
    audit::{Audit, AuditId},
    catalog::{Question, Section},
    directory::{Store, User},
    error::{StorecheckError, StorecheckResult},
};
use storecheck_core::{
    aggregate::{audit_total, latest_answers},
    traits::ChecklistBackend,
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct InMemoryState {
    pub(crate) stores: Vec<Store>,
    pub(crate) users: Vec<User>,
    pub(crate) sections: Vec<Section>,
    pub(crate) questions: Vec<Question>,
    pub(crate) audits: Vec<Audit>,
    /// All answer rows in insertion order.
    pub(crate) answers: Vec<AnswerRecord>,
    pub(crate) next_sequence: u64,
    pub(crate) next_section_id: u64,
    pub(crate) next_question_id: u64,
    /// When set, every request fails with `StorecheckError::Backend`.
    pub(crate) unavailable: bool,
}

impl InMemoryState {
    /// Recompute and store `total_score` for each audit in `audit_ids` from
    /// its current answer rows.
    pub(crate) fn refresh_totals(&mut self, audit_ids: &[AuditId]) {
        for audit in self.audits.iter_mut().filter(|a| audit_ids.contains(&a.id)) {
            let rows = self
                .answers
                .iter()
                .filter(|r| r.audit_id == audit.id)
                .cloned();
            audit.total_score = audit_total(&latest_answers(rows));
            debug!(audit_id = %audit.id, total = audit.total_score, "audit total recomputed");
        }
    }
}

// ── Public backend ────────────────────────────────────────────────────────────

/// An in-memory backend for audits, answers, and the catalog tables.
///
/// Cloning is cheap and every clone shares the same tables.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every request fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.unavailable = unavailable;
    }

    /// Lock the tables for one request.
    pub(crate) fn request(&self) -> StorecheckResult<MutexGuard<'_, InMemoryState>> {
        let state = self
            .state
            .lock()
            .map_err(|e| StorecheckError::backend(format!("store lock poisoned: {}", e)))?;
        if state.unavailable {
            return Err(StorecheckError::backend("backend unavailable"));
        }
        Ok(state)
    }

    /// Every answer row stored for `audit_id`, including superseded ones.
    pub fn answer_rows(&self, audit_id: AuditId) -> StorecheckResult<Vec<AnswerRecord>> {
        self.list_answers(audit_id)
    }
}

// ── ChecklistBackend impl ─────────────────────────────────────────────────────

impl ChecklistBackend for InMemoryBackend {
    fn load_audit(&self, audit_id: AuditId) -> StorecheckResult<Audit> {
        let state = self.request()?;
        state
            .audits
            .iter()
            .find(|a| a.id == audit_id)
            .cloned()
            .ok_or_else(|| StorecheckError::not_found("audit", audit_id))
    }

    fn list_answers(&self, audit_id: AuditId) -> StorecheckResult<Vec<AnswerRecord>> {
        let state = self.request()?;
        Ok(state
            .answers
            .iter()
            .filter(|r| r.audit_id == audit_id)
            .cloned()
            .collect())
    }

    /// Append one row, assigning the next sequence number.
    ///
    /// Rejects rows for unknown audits and questions.
    fn append_answer(&self, mut record: AnswerRecord) -> StorecheckResult<AnswerRecord> {
        let mut state = self.request()?;

        if !state.audits.iter().any(|a| a.id == record.audit_id) {
            return Err(StorecheckError::not_found("audit", record.audit_id));
        }
        if !state.questions.iter().any(|q| q.id == record.question_id) {
            return Err(StorecheckError::not_found("question", record.question_id));
        }

        record.sequence = state.next_sequence;
        state.next_sequence += 1;
        state.answers.push(record.clone());

        debug!(
            audit_id = %record.audit_id,
            question_id = %record.question_id,
            sequence = record.sequence,
            "answer row appended"
        );
        Ok(record)
    }

    fn update_audit_total(&self, audit_id: AuditId, total: f64) -> StorecheckResult<()> {
        let mut state = self.request()?;
        let audit = state
            .audits
            .iter_mut()
            .find(|a| a.id == audit_id)
            .ok_or_else(|| StorecheckError::not_found("audit", audit_id))?;
        audit.total_score = total;
        Ok(())
    }

    fn update_audit(&self, audit: &Audit) -> StorecheckResult<()> {
        let mut state = self.request()?;
        let stored = state
            .audits
            .iter_mut()
            .find(|a| a.id == audit.id)
            .ok_or_else(|| StorecheckError::not_found("audit", audit.id))?;
        *stored = audit.clone();
        Ok(())
    }
}
