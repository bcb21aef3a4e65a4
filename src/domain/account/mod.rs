// ============================================================================
// Account Domain - Events and State for the Account Lifecycle
// ============================================================================
//
// - Value objects (Account)
// - Events (AccountCreated, AccountUpdated)
// - Errors (AccountError enum)
// - Aggregate (AccountAggregate, balance derived from events)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod errors;
pub mod aggregate;

pub use value_objects::*;
pub use events::*;
pub use errors::*;
pub use aggregate::*;
