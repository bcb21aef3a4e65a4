use uuid::Uuid;

// ============================================================================
// Account Replay Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account history must start with AccountCreated")]
    NotCreated,

    #[error("Account {0} is already created")]
    AlreadyCreated(Uuid),

    #[error("Event for account {actual} applied to account {expected}")]
    AccountMismatch { expected: Uuid, actual: Uuid },

    #[error("Balance {balance} of account {id} overflows when moved by {delta}")]
    BalanceOverflow { id: Uuid, balance: i64, delta: i64 },
}
