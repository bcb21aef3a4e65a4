use async_trait::async_trait;

use crate::event_sourcing::core::{EventEnvelope, RecordedEvent};

// ============================================================================
// Event Store Seam
// ============================================================================
//
// The two operations the workflow needs from an event store:
// 1. Append one envelope to the end of a named stream, with no revision check
// 2. Read a bounded batch of recorded events starting at a revision
//
// Implementations own their transport. Anything opened for a read (a gRPC
// subscription, a lock guard) must be released before `read_batch` returns.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("stream {0} not found")]
    StreamNotFound(String),

    #[error("invalid payload for {event_type}: {reason}")]
    InvalidPayload { event_type: String, reason: String },

    #[error("event store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append a single event to `stream`, creating the stream if needed.
    ///
    /// Existing content is accepted whatever its revision.
    async fn append(&self, stream: &str, event: EventEnvelope) -> Result<(), StoreError>;

    /// Read up to `max_count` events of `stream`, forwards, from `from_revision`.
    ///
    /// A batch shorter than `max_count` means the end of the stream was reached.
    /// Reading a stream that does not exist fails with `StoreError::StreamNotFound`.
    async fn read_batch(
        &self,
        stream: &str,
        from_revision: u64,
        max_count: usize,
    ) -> Result<Vec<RecordedEvent>, StoreError>;
}
