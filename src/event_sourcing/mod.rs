// ============================================================================
// Event Sourcing Infrastructure
// ============================================================================
//
// Generic event sourcing building blocks and the event store seam.
// Account-specific code is in src/domain/
//
// ============================================================================

mod core;
mod store;

pub use self::core::*;
pub use self::store::*;
