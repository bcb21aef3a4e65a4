// ============================================================================
// Domain Layer
// ============================================================================
//
// Account-specific events and state. Kept separate from the generic event
// sourcing infrastructure in src/event_sourcing/.
//
// ============================================================================

pub mod account;
