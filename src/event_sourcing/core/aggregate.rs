use uuid::Uuid;

// ============================================================================
// Aggregate Root Pattern - Event Sourcing Core
// ============================================================================
//
// State is derived from events, never stored directly. Replaying the same
// history always produces the same aggregate.
//
// ============================================================================

/// Error raised while rebuilding an aggregate from its history
#[derive(Debug, thiserror::Error)]
pub enum ReplayError<E: std::error::Error + 'static> {
    #[error("no events to load")]
    EmptyHistory,

    #[error("failed to apply event at revision {revision}: {source}")]
    Apply {
        revision: u64,
        #[source]
        source: E,
    },
}

/// Generic Aggregate trait - all event-sourced aggregates implement this
///
/// Type Parameters:
/// - `Event`: The domain event type for this aggregate
/// - `Error`: The error type for rejected events
pub trait Aggregate: Sized + Send + Sync {
    type Event;
    type Error: std::error::Error + 'static;

    /// Create new aggregate from first event
    fn apply_first_event(event: &Self::Event) -> Result<Self, Self::Error>;

    /// Apply subsequent events to update state
    fn apply_event(&mut self, event: &Self::Event) -> Result<(), Self::Error>;

    fn aggregate_id(&self) -> Uuid;

    /// Revision of the last applied event
    fn version(&self) -> u64;

    /// Load aggregate from event history (reconstruct from events)
    fn load_from_events<I>(events: I) -> Result<Self, ReplayError<Self::Error>>
    where
        I: IntoIterator<Item = Self::Event>,
    {
        let mut events = events.into_iter();
        let first = events.next().ok_or(ReplayError::EmptyHistory)?;

        let mut aggregate = Self::apply_first_event(&first)
            .map_err(|source| ReplayError::Apply { revision: 0, source })?;

        for (offset, event) in events.enumerate() {
            aggregate
                .apply_event(&event)
                .map_err(|source| ReplayError::Apply {
                    revision: offset as u64 + 1,
                    source,
                })?;
        }

        Ok(aggregate)
    }
}
