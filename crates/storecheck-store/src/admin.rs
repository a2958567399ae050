//! Administration of stores, users, sections, questions, and audits.
//!
//! Deleting a question removes its answer rows; deleting a section removes
//! its questions and their answer rows. Either way the totals of the audits
//! that lost rows are recomputed. Stores that still have audits cannot
//! be deleted.

use serde::{Deserialize, Serialize};
use tracing::info;

use storecheck_contracts::{
    answer::AnswerRecord,
    audit::{Audit, AuditId},
    catalog::{Catalog, Question, QuestionId, Section, SectionId},
    directory::{Role, Store, StoreId, User, UserId},
    error::{StorecheckError, StorecheckResult},
};

use crate::{memory::InMemoryBackend, validate};

/// Input for `InMemoryBackend::create_user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// What a cascading delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub questions: usize,
    pub answers: usize,
}

impl InMemoryBackend {
    // ── Stores ───────────────────────────────────────────────────────────────

    pub fn create_store(&self, name: &str, code: &str, city: Option<&str>) -> StorecheckResult<Store> {
        let name = validate::required_text("store name", name)?;
        let code = validate::required_text("store code", code)?;
        let mut state = self.request()?;

        if state.stores.iter().any(|s| s.code.eq_ignore_ascii_case(&code)) {
            return Err(StorecheckError::validation(format!("store code '{code}' already exists")));
        }

        let store = Store {
            id: StoreId::new(),
            name,
            code,
            city: city.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
        };
        state.stores.push(store.clone());
        info!(store_id = %store.id, code = %store.code, "store created");
        Ok(store)
    }

    pub fn update_store(&self, store: &Store) -> StorecheckResult<()> {
        let name = validate::required_text("store name", &store.name)?;
        let code = validate::required_text("store code", &store.code)?;
        let mut state = self.request()?;

        if state
            .stores
            .iter()
            .any(|s| s.id != store.id && s.code.eq_ignore_ascii_case(&code))
        {
            return Err(StorecheckError::validation(format!("store code '{code}' already exists")));
        }
        let stored = state
            .stores
            .iter_mut()
            .find(|s| s.id == store.id)
            .ok_or_else(|| StorecheckError::not_found("store", store.id))?;
        stored.name = name;
        stored.code = code;
        stored.city = store.city.clone();
        Ok(())
    }

    pub fn delete_store(&self, id: StoreId) -> StorecheckResult<()> {
        let mut state = self.request()?;
        if !state.stores.iter().any(|s| s.id == id) {
            return Err(StorecheckError::not_found("store", id));
        }
        let audits = state.audits.iter().filter(|a| a.store_id == id).count();
        if audits > 0 {
            return Err(StorecheckError::validation(format!(
                "store {id} has {audits} audit(s) and cannot be deleted"
            )));
        }
        state.stores.retain(|s| s.id != id);
        info!(store_id = %id, "store deleted");
        Ok(())
    }

    pub fn stores(&self) -> StorecheckResult<Vec<Store>> {
        Ok(self.request()?.stores.clone())
    }

    pub fn store(&self, id: StoreId) -> StorecheckResult<Store> {
        self.request()?
            .stores
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StorecheckError::not_found("store", id))
    }

    // ── Users ────────────────────────────────────────────────────────────────

    /// Register a user. The password is length-checked and then dropped;
    /// authentication is handled elsewhere.
    pub fn create_user(&self, input: NewUser) -> StorecheckResult<User> {
        let name = validate::required_text("name", &input.name)?;
        let email = validate::email(&input.email)?;
        validate::password(&input.password)?;

        let mut state = self.request()?;
        if state.users.iter().any(|u| u.email == email) {
            return Err(StorecheckError::validation(format!("email '{email}' is already registered")));
        }

        let user = User {
            id: UserId::new(),
            name,
            email,
            role: input.role,
        };
        state.users.push(user.clone());
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub fn users(&self) -> StorecheckResult<Vec<User>> {
        Ok(self.request()?.users.clone())
    }

    pub fn users_with_role(&self, role: Role) -> StorecheckResult<Vec<User>> {
        Ok(self
            .request()?
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    // ── Sections ─────────────────────────────────────────────────────────────

    pub fn create_section(&self, name: &str) -> StorecheckResult<Section> {
        let name = validate::required_text("section name", name)?;
        let mut state = self.request()?;
        state.next_section_id += 1;
        let section = Section {
            id: SectionId(state.next_section_id),
            name,
        };
        state.sections.push(section.clone());
        Ok(section)
    }

    pub fn rename_section(&self, id: SectionId, name: &str) -> StorecheckResult<()> {
        let name = validate::required_text("section name", name)?;
        let mut state = self.request()?;
        let section = state
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StorecheckError::not_found("section", id))?;
        section.name = name;
        Ok(())
    }

    /// Delete a section together with its questions and their answers.
    pub fn delete_section(&self, id: SectionId) -> StorecheckResult<Removed> {
        let mut state = self.request()?;
        if !state.sections.iter().any(|s| s.id == id) {
            return Err(StorecheckError::not_found("section", id));
        }

        let doomed: Vec<QuestionId> = state
            .questions
            .iter()
            .filter(|q| q.section_id == id)
            .map(|q| q.id)
            .collect();
        let affected = audits_answering(&state.answers, |q| doomed.contains(&q));
        let answers_before = state.answers.len();
        state.answers.retain(|r| !doomed.contains(&r.question_id));
        state.questions.retain(|q| q.section_id != id);
        state.sections.retain(|s| s.id != id);
        state.refresh_totals(&affected);

        let removed = Removed {
            questions: doomed.len(),
            answers: answers_before - state.answers.len(),
        };
        info!(
            section_id = %id,
            questions = removed.questions,
            answers = removed.answers,
            "section deleted"
        );
        Ok(removed)
    }

    // ── Questions ────────────────────────────────────────────────────────────

    pub fn create_question(&self, section: SectionId, text: &str, required: bool) -> StorecheckResult<Question> {
        let text = validate::required_text("question text", text)?;
        let mut state = self.request()?;
        if !state.sections.iter().any(|s| s.id == section) {
            return Err(StorecheckError::not_found("section", section));
        }
        state.next_question_id += 1;
        let question = Question {
            id: QuestionId(state.next_question_id),
            section_id: section,
            text,
            required,
        };
        state.questions.push(question.clone());
        Ok(question)
    }

    pub fn update_question(&self, id: QuestionId, text: &str, required: bool) -> StorecheckResult<()> {
        let text = validate::required_text("question text", text)?;
        let mut state = self.request()?;
        let question = state
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StorecheckError::not_found("question", id))?;
        question.text = text;
        question.required = required;
        Ok(())
    }

    /// Delete a question and every answer row that references it.
    pub fn delete_question(&self, id: QuestionId) -> StorecheckResult<Removed> {
        let mut state = self.request()?;
        if !state.questions.iter().any(|q| q.id == id) {
            return Err(StorecheckError::not_found("question", id));
        }
        let affected = audits_answering(&state.answers, |q| q == id);
        let answers_before = state.answers.len();
        state.answers.retain(|r| r.question_id != id);
        state.questions.retain(|q| q.id != id);
        state.refresh_totals(&affected);

        let removed = Removed {
            questions: 1,
            answers: answers_before - state.answers.len(),
        };
        info!(question_id = %id, answers = removed.answers, "question deleted");
        Ok(removed)
    }

    /// Snapshot the current sections and questions as a catalog.
    pub fn catalog(&self) -> StorecheckResult<Catalog> {
        let state = self.request()?;
        Catalog::new(state.sections.clone(), state.questions.clone())
    }

    // ── Audits ───────────────────────────────────────────────────────────────

    /// Open a new in-progress audit of `store` by `auditor`.
    pub fn start_audit(&self, store: StoreId, auditor: UserId) -> StorecheckResult<Audit> {
        let mut state = self.request()?;
        if !state.stores.iter().any(|s| s.id == store) {
            return Err(StorecheckError::not_found("store", store));
        }
        let user = state
            .users
            .iter()
            .find(|u| u.id == auditor)
            .ok_or_else(|| StorecheckError::not_found("user", auditor))?;
        if !user.role.can_audit() {
            return Err(StorecheckError::validation(format!(
                "user '{}' has role '{}' and cannot run audits",
                user.name, user.role
            )));
        }

        let audit = Audit::start(store, auditor);
        state.audits.push(audit.clone());
        info!(audit_id = %audit.id, store_id = %store, auditor_id = %auditor, "audit started");
        Ok(audit)
    }

    pub fn audits(&self) -> StorecheckResult<Vec<Audit>> {
        Ok(self.request()?.audits.clone())
    }

    /// All audits of one store, newest first.
    pub fn audit_history(&self, store: StoreId) -> StorecheckResult<Vec<Audit>> {
        let mut history: Vec<Audit> = self
            .request()?
            .audits
            .iter()
            .filter(|a| a.store_id == store)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(history)
    }
}

/// Audits with at least one answer row on a question matching `doomed`.
fn audits_answering(answers: &[AnswerRecord], doomed: impl Fn(QuestionId) -> bool) -> Vec<AuditId> {
    let mut affected: Vec<AuditId> = Vec::new();
    for row in answers.iter().filter(|r| doomed(r.question_id)) {
        if !affected.contains(&row.audit_id) {
            affected.push(row.audit_id);
        }
    }
    affected
}
