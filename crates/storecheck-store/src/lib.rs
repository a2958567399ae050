//! # storecheck-store
//!
//! In-memory storage for the storecheck audit engine.
//!
//! ## Overview
//!
//! [`InMemoryBackend`] implements the
//! [`ChecklistBackend`](storecheck_core::traits::ChecklistBackend) trait with
//! append-only answer rows, and adds the administrative operations the
//! back office needs: stores, users, sections, questions, and audit history.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storecheck_store::InMemoryBackend;
//!
//! let backend = InMemoryBackend::new();
//! let section = backend.create_section("Storefront")?;
//! backend.create_question(section.id, "Is the facade clean?", true)?;
//! let session = ChecklistSession::open(audit.id, backend.catalog()?, policy, Box::new(backend.clone()))?;
//! ```

pub mod admin;
pub mod memory;
pub mod validate;

pub use admin::{NewUser, Removed};
pub use memory::InMemoryBackend;

// ── Tests ─────────────────────────────────────────────────────────────────────
