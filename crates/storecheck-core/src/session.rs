//! The checklist session: one authoritative owner of an audit's live state.
//!
//! A session ties the four components together for a single audit:
//!
//!   submit → persist row → update current answers → recompute → persist total
//!
//! Completion, totals, view modes, and navigation are all derived from the
//! session's current-answer map, so there is exactly one place where the
//! audit's state lives. A failed backend call never leaves the session with
//! state the backend does not have.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use tracing::{debug, info, warn};

use storecheck_contracts::{
    answer::{AnswerId, AnswerInput, AnswerRecord, AnswerValue},
    audit::{Audit, AuditId, AuditStatus},
    catalog::{Catalog, QuestionId, SectionId},
    error::{StorecheckError, StorecheckResult},
    progress::{CompletionState, NavigationOutcome, SectionProgress, ViewMode},
    report::{AnswerLine, AuditReport, SectionSummary},
};

use crate::{
    aggregate::{audit_total, latest_answers, section_subtotal},
    completion::{catalog_progress, section_progress},
    navigation::NavigationGate,
    traits::{ChecklistBackend, ScoringPolicy},
};

/// What a successful `submit_answer` produced.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The row as stored by the backend.
    pub record: AnswerRecord,
    /// Progress of the answered question's section after the write.
    pub section: SectionProgress,
    /// The audit total after the write.
    pub total: f64,
}

/// Live state for one audit being filled in.
pub struct ChecklistSession {
    audit: Audit,
    catalog: Catalog,
    policy: Box<dyn ScoringPolicy>,
    backend: Box<dyn ChecklistBackend>,
    gate: NavigationGate,
    current: HashMap<QuestionId, AnswerRecord>,
    active: SectionId,
    modes: HashMap<SectionId, ViewMode>,
    flagged: BTreeSet<SectionId>,
}

impl ChecklistSession {
    /// Load `audit_id` and its answers and position on the first section.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty catalog, `NotFound` for a missing audit, and
    /// `Backend` if reading answers fails twice in a row.
    pub fn open(
        audit_id: AuditId,
        catalog: Catalog,
        policy: Box<dyn ScoringPolicy>,
        backend: Box<dyn ChecklistBackend>,
    ) -> StorecheckResult<Self> {
        let first = catalog
            .sections()
            .first()
            .map(|s| s.id)
            .ok_or_else(|| StorecheckError::validation("catalog has no sections"))?;

        let audit = backend.load_audit(audit_id)?;
        let rows = read_answers_with_retry(backend.as_ref(), audit_id)?;
        let current = latest_answers(rows);

        let total = audit_total(&current);
        if total != audit.total_score {
            debug!(
                audit_id = %audit_id,
                stored = audit.total_score,
                recomputed = total,
                "stored total differs from recomputed total"
            );
        }

        info!(
            audit_id = %audit_id,
            sections = catalog.sections().len(),
            answered = current.len(),
            "checklist session opened"
        );

        Ok(Self {
            audit,
            gate: NavigationGate::new(policy.incomplete_policy()),
            catalog,
            policy,
            backend,
            current,
            active: first,
            modes: HashMap::new(),
            flagged: BTreeSet::new(),
        })
    }

    pub fn audit(&self) -> &Audit {
        &self.audit
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_section(&self) -> SectionId {
        self.active
    }

    /// The current (most recent) answer for `question`, if any.
    pub fn current_answer(&self, question: QuestionId) -> Option<&AnswerRecord> {
        self.current.get(&question)
    }

    // ── Answers ──────────────────────────────────────────────────────────────

    /// Record an answer and recompute the audit total.
    ///
    /// The row is appended first; the current-answer map only changes once the
    /// backend has accepted it. The recomputed total is then written back to
    /// the audit. If that second write fails the answer stays recorded and the
    /// error is returned; `reload` writes the total again.
    pub fn submit_answer(&mut self, input: AnswerInput) -> StorecheckResult<SubmitOutcome> {
        if self.audit.is_completed() {
            return Err(StorecheckError::validation(format!(
                "audit {} is completed and can no longer be edited",
                self.audit.id
            )));
        }

        let section_id = self
            .catalog
            .section_of(input.question_id)
            .ok_or_else(|| StorecheckError::not_found("question", input.question_id))?;

        if self.mode(section_id) == ViewMode::View {
            return Err(StorecheckError::validation(format!(
                "section {section_id} is read-only; switch it to edit mode first"
            )));
        }

        let value = parse_answer(&input.value)?;
        let record = AnswerRecord {
            id: AnswerId::new(),
            audit_id: self.audit.id,
            question_id: input.question_id,
            value: Some(value),
            raw_value: input.value.trim().to_string(),
            points: self.policy.points(value),
            note: non_blank(input.note),
            attachment: non_blank(input.attachment),
            created_at: Utc::now(),
            sequence: 0,
        };

        let stored = self.backend.append_answer(record).map_err(|e| {
            warn!(
                audit_id = %self.audit.id,
                question_id = %input.question_id,
                error = %e,
                "answer write failed; session state unchanged"
            );
            e
        })?;

        debug!(
            audit_id = %self.audit.id,
            question_id = %stored.question_id,
            value = %value,
            points = stored.points,
            "answer recorded"
        );

        self.current.insert(stored.question_id, stored.clone());
        self.modes.insert(section_id, ViewMode::Edit);

        let section = self.section_progress_of(section_id);
        if section.is_complete() {
            self.flagged.remove(&section_id);
        }

        let total = self.persist_total()?;

        Ok(SubmitOutcome {
            record: stored,
            section,
            total,
        })
    }

    /// Re-read every answer row from the backend, rebuild current state, and
    /// write the recomputed total back to the audit.
    ///
    /// Returns the recomputed total. If the read fails the previous state is
    /// kept; if only the total write fails the answers are refreshed and the
    /// error is returned.
    pub fn reload(&mut self) -> StorecheckResult<f64> {
        let rows = read_answers_with_retry(self.backend.as_ref(), self.audit.id)?;
        self.current = latest_answers(rows);

        let complete: Vec<SectionId> = self
            .flagged
            .iter()
            .copied()
            .filter(|s| self.section_progress_of(*s).is_complete())
            .collect();
        for section in complete {
            self.flagged.remove(&section);
        }

        let total = self.persist_total()?;
        debug!(audit_id = %self.audit.id, total, "answers reloaded");
        Ok(total)
    }

    fn persist_total(&mut self) -> StorecheckResult<f64> {
        let total = audit_total(&self.current);
        self.backend
            .update_audit_total(self.audit.id, total)
            .map_err(|e| {
                warn!(audit_id = %self.audit.id, total, error = %e, "total score write failed");
                e
            })?;
        self.audit.total_score = total;
        Ok(total)
    }

    // ── Completion and totals ────────────────────────────────────────────────

    /// Progress of every section in display order.
    pub fn progress(&self) -> Vec<SectionProgress> {
        catalog_progress(&self.catalog, &self.current, self.policy.required_rule())
    }

    pub fn section_progress(&self, section: SectionId) -> StorecheckResult<SectionProgress> {
        self.require_section(section)?;
        Ok(self.section_progress_of(section))
    }

    fn section_progress_of(&self, section: SectionId) -> SectionProgress {
        section_progress(
            section,
            self.catalog.questions_in(section),
            &self.current,
            self.policy.required_rule(),
        )
    }

    /// Sections in the given completion state.
    pub fn sections_in_state(&self, state: CompletionState) -> BTreeSet<SectionId> {
        self.progress()
            .into_iter()
            .filter(|p| p.state == state)
            .map(|p| p.section_id)
            .collect()
    }

    /// Sections that were left incomplete under the flag policy and are still
    /// not complete.
    pub fn flagged_sections(&self) -> &BTreeSet<SectionId> {
        &self.flagged
    }

    pub fn total(&self) -> f64 {
        audit_total(&self.current)
    }

    /// Subtotal of one section. Unknown sections are worth 0.
    pub fn section_total(&self, section: SectionId) -> f64 {
        section_subtotal(&self.catalog, section, &self.current)
    }

    pub fn is_ready_to_complete(&self) -> bool {
        self.progress().iter().all(SectionProgress::is_complete)
    }

    // ── View mode ────────────────────────────────────────────────────────────

    /// Complete sections default to `View`; everything else to `Edit`.
    /// An explicit choice by the auditor overrides the default until they
    /// leave the section.
    pub fn mode(&self, section: SectionId) -> ViewMode {
        if self.audit.is_completed() {
            return ViewMode::View;
        }
        if let Some(mode) = self.modes.get(&section) {
            return *mode;
        }
        if self.section_progress_of(section).is_complete() {
            ViewMode::View
        } else {
            ViewMode::Edit
        }
    }

    /// Re-open a section for editing.
    pub fn edit_section(&mut self, section: SectionId) -> StorecheckResult<()> {
        self.require_section(section)?;
        if self.audit.is_completed() {
            return Err(StorecheckError::validation(format!(
                "audit {} is completed and can no longer be edited",
                self.audit.id
            )));
        }
        self.modes.insert(section, ViewMode::Edit);
        debug!(audit_id = %self.audit.id, section_id = %section, "section switched to edit mode");
        Ok(())
    }

    /// Switch a complete section to read-only view.
    pub fn view_section(&mut self, section: SectionId) -> StorecheckResult<()> {
        let progress = self.section_progress(section)?;
        if !progress.is_complete() {
            return Err(StorecheckError::validation(format!(
                "section {section} is {} and cannot be shown read-only",
                progress.state
            )));
        }
        self.modes.insert(section, ViewMode::View);
        debug!(audit_id = %self.audit.id, section_id = %section, "section switched to view mode");
        Ok(())
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    /// Jump directly to `target`.
    pub fn switch_to(&mut self, target: SectionId) -> StorecheckResult<NavigationOutcome> {
        self.require_section(target)?;
        Ok(self.navigate(target))
    }

    /// Move to the following section.
    pub fn next(&mut self) -> NavigationOutcome {
        match self.neighbour(1) {
            Some(target) => self.navigate(target),
            None => NavigationOutcome::AtBoundary { section: self.active },
        }
    }

    /// Move to the preceding section.
    pub fn previous(&mut self) -> NavigationOutcome {
        match self.neighbour(-1) {
            Some(target) => self.navigate(target),
            None => NavigationOutcome::AtBoundary { section: self.active },
        }
    }

    fn neighbour(&self, step: isize) -> Option<SectionId> {
        let pos = self.catalog.position_of(self.active)?;
        let target = pos.checked_add_signed(step)?;
        self.catalog.sections().get(target).map(|s| s.id)
    }

    fn navigate(&mut self, target: SectionId) -> NavigationOutcome {
        let from = self.section_progress_of(self.active);
        let mode = self.mode(self.active);
        let outcome = self.gate.evaluate(&from, mode, target);

        match &outcome {
            NavigationOutcome::Moved { from, to, flagged_incomplete } => {
                if let Some(section) = flagged_incomplete {
                    info!(
                        audit_id = %self.audit.id,
                        section_id = %section,
                        "left section with unanswered required questions"
                    );
                    self.flagged.insert(*section);
                }
                self.modes.remove(from);
                self.active = *to;
                debug!(audit_id = %self.audit.id, from = %from, to = %to, "active section changed");
            }
            NavigationOutcome::Blocked { section, missing, .. } => {
                warn!(
                    audit_id = %self.audit.id,
                    section_id = %section,
                    missing = missing.len(),
                    "navigation blocked by unanswered required questions"
                );
            }
            NavigationOutcome::Stayed { .. } | NavigationOutcome::AtBoundary { .. } => {}
        }

        outcome
    }

    // ── Audit lifecycle ──────────────────────────────────────────────────────

    /// Record who signed off on the visit. Blank names clear the field.
    pub fn set_signatories(
        &mut self,
        supervisor: Option<String>,
        manager: Option<String>,
    ) -> StorecheckResult<()> {
        let mut updated = self.audit.clone();
        updated.supervisor_name = non_blank(supervisor);
        updated.manager_name = non_blank(manager);
        self.backend.update_audit(&updated)?;
        self.audit = updated;
        Ok(())
    }

    /// Mark the audit completed. Every section must be complete.
    pub fn complete_audit(&mut self) -> StorecheckResult<&Audit> {
        let pending: Vec<String> = self
            .progress()
            .into_iter()
            .filter(|p| !p.is_complete())
            .filter_map(|p| self.catalog.section(p.section_id).map(|s| s.name.clone()))
            .collect();
        if !pending.is_empty() {
            return Err(StorecheckError::validation(format!(
                "cannot complete audit; unfinished sections: {}",
                pending.join(", ")
            )));
        }

        let mut updated = self.audit.clone();
        updated.transition(AuditStatus::Completed)?;
        updated.total_score = audit_total(&self.current);
        self.backend.update_audit(&updated)?;
        self.audit = updated;

        info!(
            audit_id = %self.audit.id,
            total = self.audit.total_score,
            "audit completed"
        );
        Ok(&self.audit)
    }

    // ── Reporting ────────────────────────────────────────────────────────────

    /// Snapshot the audit into a report with one summary per section.
    pub fn report(&self) -> AuditReport {
        let rule = self.policy.required_rule();
        let sections = self
            .catalog
            .sections()
            .iter()
            .map(|section| {
                let questions = self.catalog.questions_in(section.id);
                let progress = section_progress(section.id, questions, &self.current, rule);
                let answers = questions
                    .iter()
                    .filter_map(|q| {
                        self.current.get(&q.id).map(|r| AnswerLine {
                            question_id: q.id,
                            question: q.text.clone(),
                            answer: r
                                .value
                                .map(|v| v.label().to_string())
                                .unwrap_or_else(|| r.raw_value.clone()),
                            points: r.points,
                            note: r.note.clone(),
                            attachment: r.attachment.clone(),
                        })
                    })
                    .collect();
                SectionSummary {
                    section_id: section.id,
                    name: section.name.clone(),
                    state: progress.state,
                    answered_required: progress.answered_required,
                    required_total: progress.required_total,
                    subtotal: section_subtotal(&self.catalog, section.id, &self.current),
                    answers,
                }
            })
            .collect();

        AuditReport {
            audit: self.audit.clone(),
            sections,
            total: self.total(),
            generated_at: Utc::now(),
        }
    }

    fn require_section(&self, section: SectionId) -> StorecheckResult<()> {
        self.catalog
            .section(section)
            .map(|_| ())
            .ok_or_else(|| StorecheckError::not_found("section", section))
    }
}

/// Read answers, retrying once if the first attempt hits a backend error.
fn read_answers_with_retry(
    backend: &dyn ChecklistBackend,
    audit_id: AuditId,
) -> StorecheckResult<Vec<AnswerRecord>> {
    match backend.list_answers(audit_id) {
        Err(StorecheckError::Backend { reason }) => {
            warn!(audit_id = %audit_id, reason = %reason, "answer read failed, retrying once");
            backend.list_answers(audit_id)
        }
        other => other,
    }
}

fn parse_answer(raw: &str) -> StorecheckResult<AnswerValue> {
    if raw.trim().is_empty() {
        return Err(StorecheckError::validation("an answer value is required"));
    }
    AnswerValue::parse(raw).ok_or_else(|| {
        StorecheckError::validation(format!(
            "'{}' is not one of Yes, No, Regular, Not Applicable",
            raw.trim()
        ))
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use storecheck_contracts::{
        answer::{AnswerInput, AnswerRecord, AnswerValue},
        audit::{Audit, AuditId},
        catalog::{Catalog, Question, QuestionId, Section, SectionId},
        directory::{StoreId, UserId},
        error::{StorecheckError, StorecheckResult},
        policy::{IncompletePolicy, RequiredRule},
        progress::{CompletionState, NavigationOutcome, ViewMode},
    };

    use crate::{scoring::DefaultPolicy, traits::{ChecklistBackend, ScoringPolicy}};

    use super::ChecklistSession;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    #[derive(Default)]
    struct MockState {
        audit: Option<Audit>,
        rows: Vec<AnswerRecord>,
        list_failures: u32,
        list_calls: u32,
        fail_append: bool,
        fail_total: bool,
        total_writes: Vec<f64>,
    }

    /// A backend that keeps rows in memory and can be told to fail.
    #[derive(Clone, Default)]
    struct MockBackend {
        state: Arc<Mutex<MockState>>,
    }

    impl MockBackend {
        fn with_audit(audit: Audit) -> Self {
            let backend = Self::default();
            backend.state.lock().unwrap().audit = Some(audit);
            backend
        }
    }

    impl ChecklistBackend for MockBackend {
        fn load_audit(&self, audit_id: AuditId) -> StorecheckResult<Audit> {
            self.state
                .lock()
                .unwrap()
                .audit
                .clone()
                .filter(|a| a.id == audit_id)
                .ok_or_else(|| StorecheckError::not_found("audit", audit_id))
        }

        fn list_answers(&self, _audit_id: AuditId) -> StorecheckResult<Vec<AnswerRecord>> {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            if state.list_failures > 0 {
                state.list_failures -= 1;
                return Err(StorecheckError::backend("timeout"));
            }
            Ok(state.rows.clone())
        }

        fn append_answer(&self, mut record: AnswerRecord) -> StorecheckResult<AnswerRecord> {
            let mut state = self.state.lock().unwrap();
            if state.fail_append {
                return Err(StorecheckError::backend("insert rejected"));
            }
            record.sequence = state.rows.len() as u64;
            state.rows.push(record.clone());
            Ok(record)
        }

        fn update_audit_total(&self, _audit_id: AuditId, total: f64) -> StorecheckResult<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_total {
                return Err(StorecheckError::backend("update rejected"));
            }
            state.total_writes.push(total);
            if let Some(audit) = state.audit.as_mut() {
                audit.total_score = total;
            }
            Ok(())
        }

        fn update_audit(&self, audit: &Audit) -> StorecheckResult<()> {
            self.state.lock().unwrap().audit = Some(audit.clone());
            Ok(())
        }
    }

    struct FlagPolicy;

    impl ScoringPolicy for FlagPolicy {
        fn points(&self, value: AnswerValue) -> f64 {
            DefaultPolicy.points(value)
        }

        fn incomplete_policy(&self) -> IncompletePolicy {
            IncompletePolicy::Flag
        }
    }

    struct LegacyPolicy;

    impl ScoringPolicy for LegacyPolicy {
        fn points(&self, value: AnswerValue) -> f64 {
            DefaultPolicy.points(value)
        }

        fn required_rule(&self) -> RequiredRule {
            RequiredRule::LEGACY
        }
    }

    /// Section 1: questions 1-5, first three required.
    /// Section 2: questions 6-8, all required.
    /// Section 3: question 9, required.
    fn make_catalog() -> Catalog {
        let q = |id: u64, section: u64, required: bool| Question {
            id: QuestionId(id),
            section_id: SectionId(section),
            text: format!("question {id}"),
            required,
        };
        Catalog::new(
            vec![
                Section { id: SectionId(1), name: "Storefront".into() },
                Section { id: SectionId(2), name: "Sales floor".into() },
                Section { id: SectionId(3), name: "Checkout".into() },
            ],
            vec![
                q(1, 1, true),
                q(2, 1, true),
                q(3, 1, true),
                q(4, 1, false),
                q(5, 1, false),
                q(6, 2, true),
                q(7, 2, true),
                q(8, 2, true),
                q(9, 3, true),
            ],
        )
        .unwrap()
    }

    fn open_with(policy: Box<dyn ScoringPolicy>) -> (ChecklistSession, MockBackend) {
        let audit = Audit::start(StoreId::new(), UserId::new());
        let backend = MockBackend::with_audit(audit.clone());
        let session =
            ChecklistSession::open(audit.id, make_catalog(), policy, Box::new(backend.clone()))
                .unwrap();
        (session, backend)
    }

    fn open() -> (ChecklistSession, MockBackend) {
        open_with(Box::new(DefaultPolicy))
    }

    fn answer(session: &mut ChecklistSession, question: u64, value: &str) {
        session
            .submit_answer(AnswerInput::new(QuestionId(question), value))
            .unwrap();
    }

    fn complete_section(session: &mut ChecklistSession, questions: &[u64]) {
        for q in questions {
            answer(session, *q, "Yes");
        }
    }

    // ── Scoring and completion ───────────────────────────────────────────────

    #[test]
    fn three_required_answers_total_half_point() {
        let (mut session, backend) = open();

        answer(&mut session, 1, "Yes");
        answer(&mut session, 2, "No");
        let outcome = session
            .submit_answer(AnswerInput::new(QuestionId(3), "Regular"))
            .unwrap();

        assert_eq!(outcome.total, 0.5);
        assert_eq!(outcome.section.state, CompletionState::Complete);
        assert_eq!(session.total(), 0.5);
        assert_eq!(session.section_total(SectionId(1)), 0.5);
        assert_eq!(session.audit().total_score, 0.5);

        // The total was persisted after every answer.
        let writes = backend.state.lock().unwrap().total_writes.clone();
        assert_eq!(writes, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn revised_answer_counts_once() {
        let (mut session, backend) = open();

        answer(&mut session, 1, "Yes");
        answer(&mut session, 1, "No");

        assert_eq!(session.total(), -1.0);
        assert_eq!(
            session.current_answer(QuestionId(1)).unwrap().value,
            Some(AnswerValue::No)
        );
        // Both rows are kept; only the latest counts.
        assert_eq!(backend.state.lock().unwrap().rows.len(), 2);
    }

    #[test]
    fn reload_reproduces_submitted_total() {
        let (mut session, _backend) = open();

        answer(&mut session, 1, "Yes");
        answer(&mut session, 6, "Regular");
        answer(&mut session, 6, "No");
        let after_submit = session.total();

        let after_reload = session.reload().unwrap();
        assert_eq!(after_submit, after_reload);
        assert_eq!(after_reload, 0.0);
    }

    #[test]
    fn section_states_track_answers() {
        let (mut session, _backend) = open();
        assert_eq!(session.sections_in_state(CompletionState::Untouched).len(), 3);

        answer(&mut session, 6, "Yes");
        let progress = session.section_progress(SectionId(2)).unwrap();
        assert_eq!(progress.state, CompletionState::Incomplete);
        assert_eq!(progress.missing, vec![QuestionId(7), QuestionId(8)]);

        let incomplete = session.sections_in_state(CompletionState::Incomplete);
        let complete = session.sections_in_state(CompletionState::Complete);
        assert!(incomplete.contains(&SectionId(2)));
        assert!(incomplete.is_disjoint(&complete));
    }

    #[test]
    fn legacy_rule_ignores_flags() {
        let (mut session, _backend) = open_with(Box::new(LegacyPolicy));

        // Section 2 has three questions; legacy rule makes only the first required.
        answer(&mut session, 6, "Yes");
        assert!(session.section_progress(SectionId(2)).unwrap().is_complete());
        // Section 3 has one question; nothing is required.
        assert!(session.section_progress(SectionId(3)).unwrap().is_complete());
    }

    // ── Validation and failures ──────────────────────────────────────────────

    #[test]
    fn unrecognized_answer_is_rejected_before_writing() {
        let (mut session, backend) = open();

        let err = session
            .submit_answer(AnswerInput::new(QuestionId(1), "sometimes"))
            .unwrap_err();
        assert!(matches!(err, StorecheckError::Validation { .. }));

        let err = session.submit_answer(AnswerInput::new(QuestionId(1), "  ")).unwrap_err();
        assert!(err.to_string().contains("required"));

        assert!(backend.state.lock().unwrap().rows.is_empty());
    }

    #[test]
    fn unknown_question_is_not_found() {
        let (mut session, _backend) = open();
        let err = session
            .submit_answer(AnswerInput::new(QuestionId(99), "Yes"))
            .unwrap_err();
        assert!(matches!(err, StorecheckError::NotFound { .. }));
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let (mut session, backend) = open();
        answer(&mut session, 1, "Yes");

        backend.state.lock().unwrap().fail_append = true;
        let err = session
            .submit_answer(AnswerInput::new(QuestionId(2), "No"))
            .unwrap_err();

        assert!(matches!(err, StorecheckError::Backend { .. }));
        assert!(session.current_answer(QuestionId(2)).is_none());
        assert_eq!(session.total(), 1.0);
        assert_eq!(session.audit().total_score, 1.0);
    }

    #[test]
    fn failed_total_write_keeps_answer_but_not_total() {
        let (mut session, backend) = open();
        backend.state.lock().unwrap().fail_total = true;

        let err = session
            .submit_answer(AnswerInput::new(QuestionId(1), "Yes"))
            .unwrap_err();
        assert!(matches!(err, StorecheckError::Backend { .. }));

        // The row reached the backend, so the session mirrors it.
        assert!(session.current_answer(QuestionId(1)).is_some());
        assert_eq!(session.audit().total_score, 0.0);
    }

    #[test]
    fn reload_rewrites_total_after_failed_write() {
        let (mut session, backend) = open();
        backend.state.lock().unwrap().fail_total = true;
        assert!(session
            .submit_answer(AnswerInput::new(QuestionId(1), "Yes"))
            .is_err());
        assert!(backend.state.lock().unwrap().total_writes.is_empty());

        // Still failing: answers refresh but the error surfaces.
        assert!(matches!(session.reload(), Err(StorecheckError::Backend { .. })));
        assert_eq!(session.total(), 1.0);
        assert_eq!(session.audit().total_score, 0.0);

        backend.state.lock().unwrap().fail_total = false;
        assert_eq!(session.reload().unwrap(), 1.0);
        assert_eq!(backend.state.lock().unwrap().total_writes, vec![1.0]);
        assert_eq!(session.audit().total_score, 1.0);
    }

    #[test]
    fn reload_clears_flag_of_section_completed_elsewhere() {
        let (mut session, backend) = open_with(Box::new(FlagPolicy));
        answer(&mut session, 1, "Yes");
        assert!(session.next().moved());
        assert!(session.flagged_sections().contains(&SectionId(1)));

        let audit_id = session.audit().id;
        let mut other = ChecklistSession::open(
            audit_id,
            make_catalog(),
            Box::new(FlagPolicy),
            Box::new(backend.clone()),
        )
        .unwrap();
        complete_section(&mut other, &[2, 3]);

        assert!(session.flagged_sections().contains(&SectionId(1)));
        assert_eq!(session.reload().unwrap(), 3.0);
        assert!(session.flagged_sections().is_empty());
        assert_eq!(session.audit().total_score, 3.0);
    }

    #[test]
    fn open_retries_answer_read_once() {
        let audit = Audit::start(StoreId::new(), UserId::new());
        let backend = MockBackend::with_audit(audit.clone());
        backend.state.lock().unwrap().list_failures = 1;

        ChecklistSession::open(audit.id, make_catalog(), Box::new(DefaultPolicy), Box::new(backend.clone()))
            .unwrap();
        assert_eq!(backend.state.lock().unwrap().list_calls, 2);
    }

    #[test]
    fn open_gives_up_after_second_failure() {
        let audit = Audit::start(StoreId::new(), UserId::new());
        let backend = MockBackend::with_audit(audit.clone());
        backend.state.lock().unwrap().list_failures = 2;

        let result =
            ChecklistSession::open(audit.id, make_catalog(), Box::new(DefaultPolicy), Box::new(backend));
        assert!(matches!(result, Err(StorecheckError::Backend { .. })));
    }

    #[test]
    fn open_missing_audit_is_not_found() {
        let backend = MockBackend::default();
        let result = ChecklistSession::open(
            AuditId::new(),
            make_catalog(),
            Box::new(DefaultPolicy),
            Box::new(backend),
        );
        assert!(matches!(result, Err(StorecheckError::NotFound { .. })));
    }

    #[test]
    fn open_empty_catalog_is_rejected() {
        let audit = Audit::start(StoreId::new(), UserId::new());
        let backend = MockBackend::with_audit(audit.clone());
        let result = ChecklistSession::open(
            audit.id,
            Catalog::default(),
            Box::new(DefaultPolicy),
            Box::new(backend),
        );
        assert!(matches!(result, Err(StorecheckError::Validation { .. })));
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    #[test]
    fn block_policy_applies_to_next_and_switch() {
        let (mut session, _backend) = open();
        answer(&mut session, 1, "Yes");

        let next = session.next();
        assert!(matches!(next, NavigationOutcome::Blocked { .. }));
        assert_eq!(session.active_section(), SectionId(1));

        let switch = session.switch_to(SectionId(3)).unwrap();
        match switch {
            NavigationOutcome::Blocked { section, missing, .. } => {
                assert_eq!(section, SectionId(1));
                assert_eq!(missing, vec![QuestionId(2), QuestionId(3)]);
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(session.active_section(), SectionId(1));
    }

    #[test]
    fn flag_policy_moves_and_clears_flag_on_completion() {
        let (mut session, _backend) = open_with(Box::new(FlagPolicy));
        answer(&mut session, 1, "Yes");

        let outcome = session.next();
        assert_eq!(
            outcome,
            NavigationOutcome::Moved {
                from: SectionId(1),
                to: SectionId(2),
                flagged_incomplete: Some(SectionId(1)),
            }
        );
        assert!(session.flagged_sections().contains(&SectionId(1)));

        // Leaving the untouched sales floor flags it too.
        assert!(session.previous().moved());
        assert!(session.flagged_sections().contains(&SectionId(2)));

        complete_section(&mut session, &[2, 3]);
        assert!(!session.flagged_sections().contains(&SectionId(1)));
        assert_eq!(session.flagged_sections().len(), 1);
    }

    #[test]
    fn untouched_section_is_blocked() {
        let (mut session, _backend) = open();
        match session.next() {
            NavigationOutcome::Blocked { section, missing, .. } => {
                assert_eq!(section, SectionId(1));
                assert_eq!(missing, vec![QuestionId(1), QuestionId(2), QuestionId(3)]);
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(session.active_section(), SectionId(1));
        assert!(!session.switch_to(SectionId(3)).unwrap().moved());
    }

    #[test]
    fn boundaries_and_same_target() {
        let (mut session, _backend) = open();

        assert_eq!(session.previous(), NavigationOutcome::AtBoundary { section: SectionId(1) });
        assert_eq!(
            session.switch_to(SectionId(1)).unwrap(),
            NavigationOutcome::Stayed { section: SectionId(1) }
        );
        assert!(matches!(
            session.switch_to(SectionId(42)),
            Err(StorecheckError::NotFound { .. })
        ));

        complete_section(&mut session, &[1, 2, 3]);
        assert!(session.switch_to(SectionId(3)).unwrap().moved());
        assert_eq!(session.next(), NavigationOutcome::AtBoundary { section: SectionId(3) });
    }

    // ── View mode ────────────────────────────────────────────────────────────

    #[test]
    fn completed_section_defaults_to_view_after_leaving() {
        let (mut session, _backend) = open();
        complete_section(&mut session, &[1, 2, 3]);

        // Still pinned to edit while the auditor is on it.
        assert_eq!(session.mode(SectionId(1)), ViewMode::Edit);
        answer(&mut session, 4, "Not Applicable");

        assert!(session.next().moved());
        assert_eq!(session.mode(SectionId(1)), ViewMode::View);

        let err = session
            .submit_answer(AnswerInput::new(QuestionId(1), "No"))
            .unwrap_err();
        assert!(err.to_string().contains("read-only"));

        session.edit_section(SectionId(1)).unwrap();
        answer(&mut session, 1, "No");
        assert_eq!(session.total(), 1.0);
    }

    #[test]
    fn view_mode_requires_complete_section() {
        let (mut session, _backend) = open();
        answer(&mut session, 6, "Yes");
        assert!(session.view_section(SectionId(2)).is_err());

        complete_section(&mut session, &[7, 8]);
        session.view_section(SectionId(2)).unwrap();
        assert_eq!(session.mode(SectionId(2)), ViewMode::View);
    }

    // ── Lifecycle and report ─────────────────────────────────────────────────

    #[test]
    fn complete_audit_requires_every_section() {
        let (mut session, backend) = open();
        complete_section(&mut session, &[1, 2, 3]);

        let err = session.complete_audit().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Sales floor"));
        assert!(msg.contains("Checkout"));
        assert!(!msg.contains("Storefront"));

        complete_section(&mut session, &[6, 7, 8, 9]);
        assert!(session.is_ready_to_complete());
        let audit = session.complete_audit().unwrap();
        assert!(audit.is_completed());
        assert_eq!(audit.total_score, 7.0);

        let stored = backend.state.lock().unwrap().audit.clone().unwrap();
        assert!(stored.is_completed());

        let err = session
            .submit_answer(AnswerInput::new(QuestionId(9), "No"))
            .unwrap_err();
        assert!(matches!(err, StorecheckError::Validation { .. }));
        assert_eq!(session.mode(SectionId(3)), ViewMode::View);
    }

    #[test]
    fn signatories_are_trimmed_and_persisted() {
        let (mut session, backend) = open();
        session
            .set_signatories(Some("  Ana Souza ".into()), Some("   ".into()))
            .unwrap();

        assert_eq!(session.audit().supervisor_name.as_deref(), Some("Ana Souza"));
        assert_eq!(session.audit().manager_name, None);
        let stored = backend.state.lock().unwrap().audit.clone().unwrap();
        assert_eq!(stored.supervisor_name.as_deref(), Some("Ana Souza"));
    }

    #[test]
    fn report_summarises_sections() {
        let (mut session, _backend) = open();
        answer(&mut session, 1, "Yes");
        session
            .submit_answer(
                AnswerInput::new(QuestionId(2), "regular")
                    .with_note("shelf labels faded")
                    .with_attachment("photos/q2.jpg"),
            )
            .unwrap();

        let report = session.report();
        assert_eq!(report.total, 1.5);
        assert_eq!(report.sections.len(), 3);

        let storefront = &report.sections[0];
        assert_eq!(storefront.state, CompletionState::Incomplete);
        assert_eq!(storefront.subtotal, 1.5);
        assert_eq!(storefront.answers.len(), 2);
        assert_eq!(storefront.answers[1].answer, "Regular");
        assert_eq!(storefront.answers[1].note.as_deref(), Some("shelf labels faded"));

        assert_eq!(report.pending_sections().count(), 3);
    }
}
