use async_trait::async_trait;
use eventstore::{
    AppendToStreamOptions, Client, ClientSettings, EventData, ReadStreamOptions, StreamPosition,
};
use serde_json::value::RawValue;

use super::event_store::{EventStore, StoreError};
use crate::event_sourcing::core::{ContentType, EventEnvelope, RecordedEvent};

// ============================================================================
// EventStoreDB Adapter
// ============================================================================
//
// Thin translation layer over the `eventstore` gRPC client. Connection
// pooling, node discovery, TLS and retries all live inside the client.
//
// ============================================================================

pub struct EsdbEventStore {
    client: Client,
}

impl EsdbEventStore {
    /// Create a client handle. No network traffic happens until the first call.
    pub fn connect(settings: ClientSettings) -> anyhow::Result<Self> {
        let client = Client::new(settings).map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(Self { client })
    }
}

/// Appends never assert the stream's current revision
const APPEND_REVISION: eventstore::ExpectedRevision = eventstore::ExpectedRevision::Any;

fn map_client_error(stream: &str, error: eventstore::Error) -> StoreError {
    match error {
        eventstore::Error::ResourceNotFound => StoreError::StreamNotFound(stream.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

/// Build the client's event representation, keeping JSON payload bytes verbatim
fn to_event_data(envelope: EventEnvelope) -> Result<EventData, StoreError> {
    let event_type = envelope.event_type;
    let data = match envelope.content_type {
        ContentType::Json => {
            let invalid = |reason: String| StoreError::InvalidPayload {
                event_type: event_type.clone(),
                reason,
            };
            let text = String::from_utf8(envelope.data).map_err(|e| invalid(e.to_string()))?;
            let raw = RawValue::from_string(text).map_err(|e| invalid(e.to_string()))?;
            EventData::json(&event_type, &raw).map_err(|e| invalid(e.to_string()))?
        }
        ContentType::Binary => EventData::binary(&event_type, bytes::Bytes::from(envelope.data)),
    };

    Ok(data.id(envelope.event_id))
}

#[async_trait]
impl EventStore for EsdbEventStore {
    async fn append(&self, stream: &str, event: EventEnvelope) -> Result<(), StoreError> {
        let data = to_event_data(event)?;
        let options = AppendToStreamOptions::default().expected_revision(APPEND_REVISION);

        self.client
            .append_to_stream(stream, &options, data)
            .await
            .map_err(|e| map_client_error(stream, e))?;
        Ok(())
    }

    async fn read_batch(
        &self,
        stream: &str,
        from_revision: u64,
        max_count: usize,
    ) -> Result<Vec<RecordedEvent>, StoreError> {
        let options = ReadStreamOptions::default()
            .forwards()
            .position(StreamPosition::Position(from_revision))
            .max_count(max_count);

        // The subscription is dropped, and its transport released, when this
        // function returns on any path.
        let mut subscription = self
            .client
            .read_stream(stream, &options)
            .await
            .map_err(|e| map_client_error(stream, e))?;

        let mut batch = Vec::with_capacity(max_count.min(1024));
        while let Some(resolved) = subscription
            .next()
            .await
            .map_err(|e| map_client_error(stream, e))?
        {
            let event = resolved.get_original_event();
            batch.push(RecordedEvent {
                stream_name: stream.to_string(),
                revision: event.revision,
                event_id: event.id,
                event_type: event.event_type.clone(),
                content_type: if event.is_json {
                    ContentType::Json
                } else {
                    ContentType::Binary
                },
                data: event.data.to_vec(),
            });
        }

        tracing::debug!(
            stream = %stream,
            from_revision = from_revision,
            count = batch.len(),
            "Read batch"
        );
        Ok(batch)
    }
}
