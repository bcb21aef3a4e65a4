use std::collections::VecDeque;
use std::io::Write;

use futures_util::stream::{self, Stream};
use futures_util::TryStreamExt;

use crate::errors::ReadError;
use crate::event_sourcing::{EventStore, RecordedEvent};

// ============================================================================
// Stream Reader
// ============================================================================
//
// Forward-only cursor over one stream. Events are fetched lazily in batches;
// the batch size bounds each store call, never the total read. End of stream
// is a short batch. Once finished, by exhaustion or error, the cursor stays
// finished.
//
// ============================================================================

/// Maximum number of events requested from the store per call
pub const READ_BATCH_SIZE: usize = 100;

pub struct EventCursor<'a, S: ?Sized> {
    store: &'a S,
    stream: String,
    batch_size: usize,
    next_revision: u64,
    buffer: VecDeque<RecordedEvent>,
    exhausted: bool,
}

impl<'a, S> EventCursor<'a, S>
where
    S: EventStore + ?Sized,
{
    /// Cursor positioned at the start of `stream`. Nothing is fetched until polled.
    pub fn new(store: &'a S, stream: impl Into<String>) -> Self {
        Self::with_batch_size(store, stream, READ_BATCH_SIZE)
    }

    pub fn with_batch_size(store: &'a S, stream: impl Into<String>, batch_size: usize) -> Self {
        Self {
            store,
            stream: stream.into(),
            batch_size: batch_size.max(1),
            next_revision: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Next event in stream order, or `None` at the end of the stream
    pub async fn next(&mut self) -> Result<Option<RecordedEvent>, ReadError> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch().await?;
        }
        Ok(self.buffer.pop_front())
    }

    async fn fetch(&mut self) -> Result<(), ReadError> {
        let batch = match self
            .store
            .read_batch(&self.stream, self.next_revision, self.batch_size)
            .await
        {
            Ok(batch) => batch,
            Err(source) => {
                self.exhausted = true;
                return Err(ReadError::Store {
                    stream: self.stream.clone(),
                    revision: self.next_revision,
                    source,
                });
            }
        };

        tracing::trace!(
            stream = %self.stream,
            from_revision = self.next_revision,
            count = batch.len(),
            "Fetched batch"
        );

        if batch.len() < self.batch_size {
            self.exhausted = true;
        }
        if let Some(last) = batch.last() {
            self.next_revision = last.revision + 1;
        }
        self.buffer.extend(batch);
        Ok(())
    }

    /// View the cursor as a `Stream` of events
    pub fn into_stream(self) -> impl Stream<Item = Result<RecordedEvent, ReadError>> + 'a
    where
        S: 'a,
    {
        stream::try_unfold(self, |mut cursor| async move {
            let next = cursor.next().await?;
            Ok::<_, ReadError>(next.map(|event| (event, cursor)))
        })
    }
}

/// How payloads are rendered on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Payload bytes as stored, one event per line
    #[default]
    Raw,
    /// Event type header followed by indented JSON
    Pretty,
}

fn write_event<W: Write>(
    out: &mut W,
    event: &RecordedEvent,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Raw => {
            out.write_all(&event.data)?;
            writeln!(out)
        }
        OutputFormat::Pretty => {
            writeln!(out)?;
            writeln!(out, "EventType: {}", event.event_type)?;
            match serde_json::from_slice::<serde_json::Value>(&event.data)
                .and_then(|value| serde_json::to_string_pretty(&value))
            {
                Ok(pretty) => writeln!(out, "{pretty}"),
                Err(e) => {
                    tracing::warn!(
                        stream = %event.stream_name,
                        revision = event.revision,
                        error = %e,
                        "Payload is not JSON, printing raw bytes"
                    );
                    out.write_all(&event.data)?;
                    writeln!(out)
                }
            }
        }
    }
}

/// Read `stream` from the start and print every event to `out`.
///
/// Returns the events read, in stream order.
pub async fn print_stream<S, W>(
    store: &S,
    stream: &str,
    out: &mut W,
    format: OutputFormat,
) -> Result<Vec<RecordedEvent>, ReadError>
where
    S: EventStore + ?Sized,
    W: Write,
{
    let cursor = EventCursor::new(store, stream).into_stream();
    futures_util::pin_mut!(cursor);
    let mut events = Vec::new();

    while let Some(event) = cursor.try_next().await? {
        write_event(out, &event, format)?;
        events.push(event);
    }
    out.flush()?;

    tracing::info!(stream = %stream, event_count = events.len(), "Read stream");
    Ok(events)
}
