use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EncodingError;
use crate::event_sourcing::{deserialize_event, serialize_event, DomainEvent};

// ============================================================================
// Account Events - Domain Events for the Account Lifecycle
// ============================================================================

/// Union type for all account events.
///
/// Each variant is stored as its own payload struct; the store's event-type
/// field carries the discriminant, so the enum itself is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountEvent {
    Created(AccountCreated),
    Updated(AccountUpdated),
}

/// Account Created - first event of every account stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccountCreated {
    pub id: Uuid,
    pub name: String,
    pub time: DateTime<Utc>,
}

impl DomainEvent for AccountCreated {
    fn event_type() -> &'static str {
        "AccountCreated"
    }
}

/// Account Updated - balance moved by `delta`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccountUpdated {
    pub id: Uuid,
    pub delta: i64,
    pub time: DateTime<Utc>,
}

impl DomainEvent for AccountUpdated {
    fn event_type() -> &'static str {
        "AccountUpdated"
    }
}

impl AccountEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Created(_) => AccountCreated::event_type(),
            AccountEvent::Updated(_) => AccountUpdated::event_type(),
        }
    }

    pub fn account_id(&self) -> Uuid {
        match self {
            AccountEvent::Created(e) => e.id,
            AccountEvent::Updated(e) => e.id,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::Created(e) => e.time,
            AccountEvent::Updated(e) => e.time,
        }
    }

    /// JSON payload of the wrapped event
    pub fn to_payload(&self) -> Result<Vec<u8>, EncodingError> {
        match self {
            AccountEvent::Created(e) => serialize_event(e),
            AccountEvent::Updated(e) => serialize_event(e),
        }
    }

    /// Decode a stored payload using its recorded type tag
    pub fn from_payload(event_type: &str, payload: &[u8]) -> Result<Self, EncodingError> {
        if event_type == AccountCreated::event_type() {
            deserialize_event(payload).map(AccountEvent::Created)
        } else if event_type == AccountUpdated::event_type() {
            deserialize_event(payload).map(AccountEvent::Updated)
        } else {
            Err(EncodingError::UnknownEventType(event_type.to_string()))
        }
    }
}

impl From<AccountCreated> for AccountEvent {
    fn from(event: AccountCreated) -> Self {
        AccountEvent::Created(event)
    }
}

impl From<AccountUpdated> for AccountEvent {
    fn from(event: AccountUpdated) -> Self {
        AccountEvent::Updated(event)
    }
}
