use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event_sourcing::Aggregate;
use super::errors::AccountError;
use super::events::AccountEvent;

// ============================================================================
// Account Aggregate - State Derived from the Account Stream
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountAggregate {
    // Identity
    pub id: Uuid,
    pub version: u64,

    // Current State (derived from events)
    pub name: String,
    pub balance: i64,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Aggregate for AccountAggregate {
    type Event = AccountEvent;
    type Error = AccountError;

    fn apply_first_event(event: &Self::Event) -> Result<Self, Self::Error> {
        match event {
            AccountEvent::Created(created) => Ok(Self {
                id: created.id,
                version: 0,
                name: created.name.clone(),
                balance: 0,
                created_at: created.time,
                updated_at: created.time,
            }),
            AccountEvent::Updated(_) => Err(AccountError::NotCreated),
        }
    }

    fn apply_event(&mut self, event: &Self::Event) -> Result<(), Self::Error> {
        if event.account_id() != self.id {
            return Err(AccountError::AccountMismatch {
                expected: self.id,
                actual: event.account_id(),
            });
        }

        match event {
            AccountEvent::Created(_) => return Err(AccountError::AlreadyCreated(self.id)),
            AccountEvent::Updated(updated) => {
                self.balance = self.balance.checked_add(updated.delta).ok_or(
                    AccountError::BalanceOverflow {
                        id: self.id,
                        balance: self.balance,
                        delta: updated.delta,
                    },
                )?;
                self.updated_at = updated.time;
            }
        }

        self.version += 1;
        Ok(())
    }

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
