use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EncodingError;

// ============================================================================
// Event Envelope - What the Store Accepts
// ============================================================================
//
// Wraps an already-serialized domain event with the identity and type
// information the event store needs. Envelopes carry no metadata.
//
// ============================================================================

/// Content type marker for an envelope payload
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Binary,
}

/// Store-ready event: fresh id, type tag, content type and payload bytes
#[derive(Clone, Debug, PartialEq)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub event_type: String,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

impl EventEnvelope {
    /// Envelope for a JSON payload with a new random event id
    pub fn json(event_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            content_type: ContentType::Json,
            data,
        }
    }
}

/// An event as the store hands it back on read
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub stream_name: String,
    /// Zero-based position of the event within its stream
    pub revision: u64,
    pub event_id: Uuid,
    pub event_type: String,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

// ============================================================================
// Domain Event Trait
// ============================================================================

/// Implemented by every concrete event payload type.
///
/// The type tag is what the store records in its event-type field.
pub trait DomainEvent: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn event_type() -> &'static str
    where
        Self: Sized;
}

// ============================================================================
// Event Serialization Helpers
// ============================================================================

pub fn serialize_event<E: DomainEvent>(event: &E) -> Result<Vec<u8>, EncodingError> {
    serde_json::to_vec(event).map_err(|source| EncodingError::Serialize {
        event_type: E::event_type(),
        source,
    })
}

pub fn deserialize_event<E: DomainEvent>(payload: &[u8]) -> Result<E, EncodingError> {
    serde_json::from_slice(payload).map_err(|source| EncodingError::Deserialize {
        event_type: E::event_type().to_string(),
        source,
    })
}
