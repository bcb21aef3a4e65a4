// ============================================================================
// Event Sourcing Store - Persistence Seam
// ============================================================================
//
// The `EventStore` trait and its implementations: EventStoreDB for real
// runs, an in-memory map for tests.
//
// ============================================================================

pub mod esdb;
pub mod event_store;
#[cfg(test)]
pub mod in_memory;

pub use esdb::EsdbEventStore;
pub use event_store::{EventStore, StoreError};
#[cfg(test)]
pub use in_memory::InMemoryEventStore;
