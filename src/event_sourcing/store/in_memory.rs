//! In-memory event store for tests.
//!
//! Streams live in a hash map behind a lock. Failure injection lets tests
//! exercise partial writes and aborted reads without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::event_store::{EventStore, StoreError};
use crate::event_sourcing::core::{EventEnvelope, RecordedEvent};

#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    streams: RwLock<HashMap<String, Vec<RecordedEvent>>>,
    appends: AtomicUsize,
    batch_reads: AtomicUsize,
    fail_appends_after: Option<usize>,
    fail_reads_from: Option<u64>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every append after the first `successful` ones fails with a backend error
    pub fn failing_appends_after(successful: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                fail_appends_after: Some(successful),
                ..Inner::default()
            }),
        }
    }

    /// Any batch read that starts at or beyond `revision` fails with a backend error
    pub fn failing_reads_from(revision: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                fail_reads_from: Some(revision),
                ..Inner::default()
            }),
        }
    }

    pub fn batch_reads(&self) -> usize {
        self.inner.batch_reads.load(Ordering::SeqCst)
    }

    pub fn stream(&self, stream: &str) -> Vec<RecordedEvent> {
        let streams = self.inner.streams.read().expect("in-memory store lock poisoned");
        streams.get(stream).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, stream: &str, event: EventEnvelope) -> Result<(), StoreError> {
        let attempt = self.inner.appends.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_appends_after.is_some_and(|limit| attempt >= limit) {
            return Err(StoreError::Backend("injected append failure".to_string()));
        }

        let mut streams = self.inner.streams.write().expect("in-memory store lock poisoned");
        let events = streams.entry(stream.to_string()).or_default();
        events.push(RecordedEvent {
            stream_name: stream.to_string(),
            revision: events.len() as u64,
            event_id: event.event_id,
            event_type: event.event_type,
            content_type: event.content_type,
            data: event.data,
        });
        Ok(())
    }

    async fn read_batch(
        &self,
        stream: &str,
        from_revision: u64,
        max_count: usize,
    ) -> Result<Vec<RecordedEvent>, StoreError> {
        self.inner.batch_reads.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_reads_from.is_some_and(|r| from_revision >= r) {
            return Err(StoreError::Backend("injected read failure".to_string()));
        }

        let streams = self.inner.streams.read().expect("in-memory store lock poisoned");
        let events = streams
            .get(stream)
            .ok_or_else(|| StoreError::StreamNotFound(stream.to_string()))?;

        Ok(events
            .iter()
            .filter(|e| e.revision >= from_revision)
            .take(max_count)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(n: u32) -> EventEnvelope {
        EventEnvelope::json("TestEvent", format!(r#"{{"n":{n}}}"#).into_bytes())
    }

    #[tokio::test]
    async fn test_append_assigns_contiguous_revisions() {
        let store = InMemoryEventStore::new();
        for n in 0..3 {
            store.append("s", envelope(n)).await.unwrap();
        }

        let revisions: Vec<u64> = store.stream("s").iter().map(|e| e.revision).collect();
        assert_eq!(revisions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_appends_to_existing_streams_are_accepted() {
        let store = InMemoryEventStore::new();
        store.append("s", envelope(0)).await.unwrap();
        store.append("s", envelope(1)).await.unwrap();
        store.append("other", envelope(2)).await.unwrap();

        let revisions: Vec<u64> = store.stream("s").iter().map(|e| e.revision).collect();
        assert_eq!(revisions, vec![0, 1]);
        assert_eq!(store.stream("other")[0].revision, 0);
    }

    #[tokio::test]
    async fn test_read_batch_bounds_and_missing_stream() {
        let store = InMemoryEventStore::new();
        for n in 0..5 {
            store.append("s", envelope(n)).await.unwrap();
        }

        let batch = store.read_batch("s", 1, 3).await.unwrap();
        assert_eq!(batch.iter().map(|e| e.revision).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(store.read_batch("s", 5, 3).await.unwrap().is_empty());

        let err = store.read_batch("missing", 0, 3).await.unwrap_err();
        assert!(matches!(err, StoreError::StreamNotFound(name) if name == "missing"));
        assert_eq!(store.batch_reads(), 3);
    }
}
