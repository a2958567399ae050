//! The completion tracker.
//!
//! A section is complete when every required question has a current answer,
//! incomplete when some but not all do, and untouched when none do. A section
//! without required questions is always complete.

use std::collections::HashMap;

use storecheck_contracts::{
    answer::AnswerRecord,
    catalog::{Catalog, Question, QuestionId, SectionId},
    policy::RequiredRule,
    progress::{CompletionState, SectionProgress},
};

/// The required subset of `questions`, which must be in display order.
pub fn required_questions(questions: &[Question], rule: RequiredRule) -> Vec<&Question> {
    match rule {
        RequiredRule::Explicit => questions.iter().filter(|q| q.required).collect(),
        RequiredRule::Positional { optional_tail } => {
            let keep = questions.len().saturating_sub(optional_tail);
            questions[..keep].iter().collect()
        }
    }
}

/// Classify one section against the current answers.
pub fn section_progress(
    section_id: SectionId,
    questions: &[Question],
    current: &HashMap<QuestionId, AnswerRecord>,
    rule: RequiredRule,
) -> SectionProgress {
    let required = required_questions(questions, rule);
    let missing: Vec<QuestionId> = required
        .iter()
        .filter(|q| !current.contains_key(&q.id))
        .map(|q| q.id)
        .collect();

    let required_total = required.len();
    let answered_required = required_total - missing.len();

    let state = if missing.is_empty() {
        CompletionState::Complete
    } else if answered_required == 0 {
        CompletionState::Untouched
    } else {
        CompletionState::Incomplete
    };

    SectionProgress {
        section_id,
        state,
        answered_required,
        required_total,
        missing,
    }
}

/// Progress of every section in catalog order.
pub fn catalog_progress(
    catalog: &Catalog,
    current: &HashMap<QuestionId, AnswerRecord>,
    rule: RequiredRule,
) -> Vec<SectionProgress> {
    catalog
        .sections()
        .iter()
        .map(|s| section_progress(s.id, catalog.questions_in(s.id), current, rule))
        .collect()
}
