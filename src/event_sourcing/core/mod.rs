// ============================================================================
// Event Sourcing Core - Generic Infrastructure Abstractions
// ============================================================================
//
// Envelopes, recorded events and the aggregate trait. Nothing in here knows
// about accounts.
//
// ============================================================================

pub mod aggregate;
pub mod event;

pub use aggregate::{Aggregate, ReplayError};
pub use event::{
    deserialize_event, serialize_event, ContentType, DomainEvent, EventEnvelope, RecordedEvent,
};
