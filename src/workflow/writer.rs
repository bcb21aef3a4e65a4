use chrono::Utc;

use crate::domain::account::{Account, AccountCreated, AccountEvent, AccountUpdated};
use crate::errors::{EncodingError, WriteError};
use crate::event_sourcing::{EventEnvelope, EventStore};

// ============================================================================
// Stream Writer
// ============================================================================
//
// Builds the synthetic lifecycle of one account and appends it, one event
// per call, to a fresh `account-<id>` stream. Appends carry no revision
// expectation. A failed append aborts the write; events already appended
// stay in the stream.
//
// ============================================================================

pub const ACCOUNT_NAME: &str = "Test Account";

/// Balance changes applied after the account is created, in order
pub const BALANCE_DELTAS: [i64; 5] = [100, 250, -399, 800, -400];

/// What was appended, kept for printing and read-back verification
#[derive(Debug, Clone)]
pub struct WrittenStream {
    pub stream_name: String,
    pub account: Account,
    pub events: Vec<AccountEvent>,
}

impl WrittenStream {
    pub fn expected_balance(&self) -> i64 {
        self.events
            .iter()
            .map(|event| match event {
                AccountEvent::Updated(updated) => updated.delta,
                AccountEvent::Created(_) => 0,
            })
            .sum()
    }
}

/// Creation event followed by one update per entry of `BALANCE_DELTAS`
pub fn account_lifecycle(account: &Account) -> Vec<AccountEvent> {
    let mut events = Vec::with_capacity(BALANCE_DELTAS.len() + 1);
    events.push(AccountEvent::from(AccountCreated {
        id: account.id,
        name: account.name.clone(),
        time: account.created,
    }));
    events.extend(BALANCE_DELTAS.iter().map(|&delta| {
        AccountEvent::from(AccountUpdated {
            id: account.id,
            delta,
            time: Utc::now(),
        })
    }));
    events
}

/// Serialize every event into a store-ready envelope with a fresh event id
pub fn build_envelopes(events: &[AccountEvent]) -> Result<Vec<EventEnvelope>, EncodingError> {
    events
        .iter()
        .map(|event| Ok(EventEnvelope::json(event.event_type(), event.to_payload()?)))
        .collect()
}

/// Write the lifecycle of a new account; returns what was written
pub async fn write_stream<S>(store: &S) -> Result<WrittenStream, WriteError>
where
    S: EventStore + ?Sized,
{
    write_account_stream(store, Account::new(ACCOUNT_NAME)).await
}

pub async fn write_account_stream<S>(store: &S, account: Account) -> Result<WrittenStream, WriteError>
where
    S: EventStore + ?Sized,
{
    let events = account_lifecycle(&account);
    let envelopes = build_envelopes(&events)?;
    let stream_name = account.stream_name();

    for (index, (event, envelope)) in events.iter().zip(envelopes).enumerate() {
        let event_id = envelope.event_id;
        store
            .append(&stream_name, envelope)
            .await
            .map_err(|source| WriteError::Append {
                stream: stream_name.clone(),
                index,
                event_type: event.event_type(),
                source,
            })?;

        tracing::debug!(
            stream = %stream_name,
            index = index,
            event_id = %event_id,
            event_type = event.event_type(),
            "Appended event"
        );
    }

    tracing::info!(
        stream = %stream_name,
        account_id = %account.id,
        event_count = events.len(),
        "✅ Wrote account stream"
    );

    Ok(WrittenStream {
        stream_name,
        account,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::{ContentType, InMemoryEventStore, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_lifecycle_shape() {
        let account = Account::new(ACCOUNT_NAME);
        let events = account_lifecycle(&account);

        assert_eq!(events.len(), 6);
        let tags: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            tags,
            vec![
                "AccountCreated",
                "AccountUpdated",
                "AccountUpdated",
                "AccountUpdated",
                "AccountUpdated",
                "AccountUpdated",
            ]
        );

        let deltas: Vec<i64> = events
            .iter()
            .filter_map(|e| match e {
                AccountEvent::Updated(u) => Some(u.delta),
                AccountEvent::Created(_) => None,
            })
            .collect();
        assert_eq!(deltas, vec![100, 250, -399, 800, -400]);
        assert!(events.iter().all(|e| e.account_id() == account.id));

        match &events[0] {
            AccountEvent::Created(created) => {
                assert_eq!(created.name, ACCOUNT_NAME);
                assert_eq!(created.time, account.created);
            }
            other => panic!("expected creation first, got {other:?}"),
        }
    }

    #[test]
    fn test_envelopes_are_json_with_fresh_ids() {
        let events = account_lifecycle(&Account::new(ACCOUNT_NAME));
        let envelopes = build_envelopes(&events).unwrap();

        assert_eq!(envelopes.len(), events.len());
        for (event, envelope) in events.iter().zip(&envelopes) {
            assert_eq!(envelope.event_type, event.event_type());
            assert_eq!(envelope.content_type, ContentType::Json);
            assert_eq!(envelope.data, event.to_payload().unwrap());
        }

        let mut ids: Vec<_> = envelopes.iter().map(|e| e.event_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), envelopes.len());
    }

    #[tokio::test]
    async fn test_write_appends_in_order() {
        let store = InMemoryEventStore::new();
        let written = write_stream(&store).await.unwrap();

        assert_eq!(written.stream_name, format!("account-{}", written.account.id));
        assert_eq!(written.expected_balance(), 351);

        let stored = store.stream(&written.stream_name);
        assert_eq!(stored.len(), 6);
        for (revision, (recorded, event)) in stored.iter().zip(&written.events).enumerate() {
            assert_eq!(recorded.revision, revision as u64);
            assert_eq!(recorded.event_type, event.event_type());
            assert_eq!(recorded.data, event.to_payload().unwrap());
        }
    }

    #[tokio::test]
    async fn test_failed_append_aborts_and_keeps_earlier_events() {
        let store = InMemoryEventStore::failing_appends_after(3);
        let account = Account::new(ACCOUNT_NAME);
        let stream_name = account.stream_name();

        let err = write_account_stream(&store, account).await.unwrap_err();
        match err {
            WriteError::Append {
                stream,
                index,
                event_type,
                source,
            } => {
                assert_eq!(stream, stream_name);
                assert_eq!(index, 3);
                assert_eq!(event_type, "AccountUpdated");
                assert!(matches!(source, StoreError::Backend(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(store.stream(&stream_name).len(), 3);
    }

    /// Counts log events carrying a given message
    struct MessageCounter {
        message: &'static str,
        count: Arc<AtomicUsize>,
    }

    impl<S: tracing::Subscriber> Layer<S> for MessageCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Matches<'a>(&'a str, bool);

            impl Visit for Matches<'_> {
                fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                    if field.name() == "message" && format!("{value:?}") == self.0 {
                        self.1 = true;
                    }
                }
            }

            let mut matches = Matches(self.message, false);
            event.record(&mut matches);
            if matches.1 {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_each_append_is_logged_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(MessageCounter {
            message: "Appended event",
            count: count.clone(),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = InMemoryEventStore::new();
        let written = write_stream(&store).await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), written.events.len());
    }

    #[tokio::test]
    async fn test_append_to_existing_stream_is_not_rejected() {
        let store = InMemoryEventStore::new();
        let account = Account::new(ACCOUNT_NAME);
        let stream_name = account.stream_name();

        write_account_stream(&store, account.clone()).await.unwrap();
        write_account_stream(&store, account).await.unwrap();

        assert_eq!(store.stream(&stream_name).len(), 12);
    }
}
