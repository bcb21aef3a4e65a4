use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Account Value Objects
// ============================================================================

/// Seed for a synthetic account lifecycle. Only its events are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
}

impl Account {
    /// New account with a random id, created now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created: Utc::now(),
        }
    }

    /// Name of the stream holding this account's events
    pub fn stream_name(&self) -> String {
        format!("account-{}", self.id)
    }
}
