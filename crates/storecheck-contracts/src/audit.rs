//! The audit visit record and its lifecycle.
//!
//! ```text
//! in_progress → completed
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    directory::{StoreId, UserId},
    error::{StorecheckError, StorecheckResult},
};

/// Unique identifier for one audit visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub uuid::Uuid);

impl AuditId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    InProgress,
    Completed,
}

impl AuditStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Statuses reachable from `self` in one step.
    pub const fn allowed_next_states(self) -> &'static [AuditStatus] {
        match self {
            Self::InProgress => &[AuditStatus::Completed],
            Self::Completed => &[],
        }
    }

    pub fn can_transition_to(self, next: AuditStatus) -> bool {
        self.allowed_next_states().contains(&next)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One store visit by one auditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub id: AuditId,
    pub store_id: StoreId,
    pub auditor_id: UserId,
    pub status: AuditStatus,
    /// Sum of current answer points. Derived; rewritten after every answer.
    pub total_score: f64,
    pub supervisor_name: Option<String>,
    pub manager_name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Audit {
    /// A fresh in-progress audit with a zero score.
    pub fn start(store_id: StoreId, auditor_id: UserId) -> Self {
        Self {
            id: AuditId::new(),
            store_id,
            auditor_id,
            status: AuditStatus::InProgress,
            total_score: 0.0,
            supervisor_name: None,
            manager_name: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Move to `next`, stamping `completed_at` when the audit completes.
    pub fn transition(&mut self, next: AuditStatus) -> StorecheckResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(StorecheckError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next == AuditStatus::Completed {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == AuditStatus::Completed
    }
}
