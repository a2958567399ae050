//! Fictional retail data for the reference scenarios.
//!
//! Every section ends with two optional questions (observations and photo
//! evidence), mirroring how the paper checklist is laid out in the stores.

use storecheck_contracts::{
    catalog::{Question, SectionId},
    directory::{Role, Store, User},
    error::StorecheckResult,
};
use storecheck_store::{InMemoryBackend, NewUser};

/// Section names and their questions as `(text, required)`.
pub const CHECKLIST: &[(&str, &[(&str, bool)])] = &[
    (
        "Storefront",
        &[
            ("Is the facade clean and undamaged?", true),
            ("Is the signage lit and legible?", true),
            ("Is the entrance free of obstructions?", true),
            ("Observations", false),
            ("Photo evidence", false),
        ],
    ),
    (
        "Sales Floor",
        &[
            ("Are shelves fully stocked?", true),
            ("Do shelf price labels match the system?", true),
            ("Are promotional displays assembled per planogram?", true),
            ("Are aisles clean and dry?", true),
            ("Observations", false),
            ("Photo evidence", false),
        ],
    ),
    (
        "Stockroom",
        &[
            ("Is stock stored off the floor?", true),
            ("Are expiry dates rotated first-in first-out?", true),
            ("Observations", false),
            ("Photo evidence", false),
        ],
    ),
    (
        "Checkout",
        &[
            ("Are all registers staffed at peak hours?", true),
            ("Is the queue under five customers?", true),
            ("Are receipts offered to every customer?", true),
            ("Observations", false),
            ("Photo evidence", false),
        ],
    ),
];

/// A seeded backend plus the people and place an audit needs.
pub struct RetailFixture {
    pub backend: InMemoryBackend,
    pub store: Store,
    pub auditor: User,
    pub supervisor: User,
    pub manager: User,
}

impl RetailFixture {
    /// Required questions of a section in display order.
    pub fn required_questions(&self, section: SectionId) -> StorecheckResult<Vec<Question>> {
        Ok(self
            .backend
            .catalog()?
            .questions_in(section)
            .iter()
            .filter(|q| q.required)
            .cloned()
            .collect())
    }
}

/// Build a backend holding the reference checklist, one store, and staff.
pub fn seed() -> StorecheckResult<RetailFixture> {
    let backend = InMemoryBackend::new();

    for (section_name, questions) in CHECKLIST {
        let section = backend.create_section(section_name)?;
        for (text, required) in questions.iter() {
            backend.create_question(section.id, text, *required)?;
        }
    }

    let store = backend.create_store("Mercado Central", "SP-014", Some("Campinas"))?;
    let auditor = staff(&backend, "Rafael Lima", "rafael.lima@example.com", Role::Auditor)?;
    let supervisor = staff(&backend, "Ana Souza", "ana.souza@example.com", Role::Supervisor)?;
    let manager = staff(&backend, "Marcos Prado", "marcos.prado@example.com", Role::Manager)?;

    Ok(RetailFixture {
        backend,
        store,
        auditor,
        supervisor,
        manager,
    })
}

fn staff(backend: &InMemoryBackend, name: &str, email: &str, role: Role) -> StorecheckResult<User> {
    backend.create_user(NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "changeme".to_string(),
        role,
    })
}

/// The answer the scripted auditor gives to the `n`-th required question
/// of a visit. Cycles so every answer value shows up in a run.
pub fn scripted_answer(n: usize) -> &'static str {
    const PATTERN: [&str; 6] = ["Yes", "Yes", "Regular", "Yes", "No", "Not Applicable"];
    PATTERN[n % PATTERN.len()]
}
