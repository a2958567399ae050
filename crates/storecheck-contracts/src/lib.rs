//! # storecheck-contracts
//!
//! Shared types and error contracts for the storecheck audit engine.
//!
//! Every crate in the workspace imports from here. Apart from small
//! constructors and the audit lifecycle check, no business logic lives in
//! this crate.

pub mod answer;
pub mod audit;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod policy;
pub mod progress;
pub mod report;
