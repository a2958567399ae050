//! Sections, questions, and the ordered catalog that groups them.
//!
//! The catalog is the static question list an audit is run against. Sections
//! are ordered by identifier, and questions are ordered by identifier within
//! their section. Position within a section matters for the legacy
//! "last two are optional" convention, so the ordering is fixed at
//! construction time and never changes afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StorecheckError, StorecheckResult};

/// Identifier of a checklist section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a checklist question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of questions, e.g. "Storefront" or "Checkout".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
}

/// A single checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// The section this question belongs to. Exactly one.
    pub section_id: SectionId,
    pub text: String,
    /// Whether the question counts toward section completion.
    ///
    /// Ignored when the completion policy uses the positional rule.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// The ordered section/question lists for one checklist.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: Vec<Section>,
    questions: BTreeMap<SectionId, Vec<Question>>,
    owner: HashMap<QuestionId, SectionId>,
}

impl Catalog {
    /// Build a catalog, sorting sections and questions by identifier.
    ///
    /// Fails with `Validation` on duplicate identifiers and with `NotFound`
    /// when a question references a section that is not in `sections`.
    pub fn new(mut sections: Vec<Section>, questions: Vec<Question>) -> StorecheckResult<Self> {
        sections.sort_by_key(|s| s.id);
        if let Some(pair) = sections.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(StorecheckError::validation(format!(
                "duplicate section id {}",
                pair[0].id
            )));
        }

        let mut grouped: BTreeMap<SectionId, Vec<Question>> =
            sections.iter().map(|s| (s.id, Vec::new())).collect();
        let mut owner = HashMap::with_capacity(questions.len());

        for question in questions {
            let bucket = grouped
                .get_mut(&question.section_id)
                .ok_or_else(|| StorecheckError::not_found("section", question.section_id))?;
            if owner.insert(question.id, question.section_id).is_some() {
                return Err(StorecheckError::validation(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
            bucket.push(question);
        }

        for bucket in grouped.values_mut() {
            bucket.sort_by_key(|q| q.id);
        }

        Ok(Self {
            sections,
            questions: grouped,
            owner,
        })
    }

    /// All sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Questions of `section` in display order. Empty for unknown sections.
    pub fn questions_in(&self, section: SectionId) -> &[Question] {
        self.questions
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The section that owns `question`.
    pub fn section_of(&self, question: QuestionId) -> Option<SectionId> {
        self.owner.get(&question).copied()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        let section = self.section_of(id)?;
        self.questions_in(section).iter().find(|q| q.id == id)
    }

    /// Zero-based position of `section` in display order.
    pub fn position_of(&self, section: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of questions across all sections.
    pub fn question_count(&self) -> usize {
        self.owner.len()
    }
}
