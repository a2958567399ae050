//! Error types for the storecheck audit engine.
//!
//! Every fallible operation returns `StorecheckResult<T>`. None of these
//! errors is fatal to the process: callers surface them to the user and keep
//! their previous state.

use thiserror::Error;

/// The unified error type for storecheck.
#[derive(Debug, Error)]
pub enum StorecheckError {
    /// The backend could not complete a read or write.
    ///
    /// The operation was aborted and local state was left unchanged.
    #[error("backend request failed: {reason}")]
    Backend { reason: String },

    /// Input was rejected before any request was attempted.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// A referenced audit, store, user, section, or question does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// An audit status change that the lifecycle does not allow.
    #[error("invalid audit transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// A policy document is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl StorecheckError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a `Validation` error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    /// Shorthand for a `Backend` error.
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend { reason: reason.into() }
    }
}

/// Convenience alias used throughout the storecheck crates.
pub type StorecheckResult<T> = Result<T, StorecheckError>;
