use crate::domain::account::{AccountAggregate, AccountEvent};
use crate::errors::VerificationError;
use crate::event_sourcing::{Aggregate, RecordedEvent};
use super::writer::WrittenStream;

// ============================================================================
// Read-Back Verification
// ============================================================================
//
// Compares what a stream returned against what was appended to it, then
// replays the recorded events into an account and checks the balance.
//
// ============================================================================

pub fn verify_stream(
    written: &WrittenStream,
    recorded: &[RecordedEvent],
) -> Result<AccountAggregate, VerificationError> {
    let stream = &written.stream_name;

    if recorded.len() != written.events.len() {
        return Err(VerificationError::EventCount {
            stream: stream.clone(),
            expected: written.events.len(),
            actual: recorded.len(),
        });
    }

    let mut decoded = Vec::with_capacity(recorded.len());
    for (expected, actual) in written.events.iter().zip(recorded) {
        if actual.event_type != expected.event_type() {
            return Err(VerificationError::EventType {
                stream: stream.clone(),
                revision: actual.revision,
                expected: expected.event_type(),
                actual: actual.event_type.clone(),
            });
        }

        let event = AccountEvent::from_payload(&actual.event_type, &actual.data).map_err(
            |source| VerificationError::Decode {
                stream: stream.clone(),
                revision: actual.revision,
                source,
            },
        )?;
        if &event != expected {
            return Err(VerificationError::Payload {
                stream: stream.clone(),
                revision: actual.revision,
            });
        }
        decoded.push(event);
    }

    let account =
        AccountAggregate::load_from_events(decoded).map_err(|source| VerificationError::Replay {
            stream: stream.clone(),
            source,
        })?;

    let expected = written.expected_balance();
    if account.balance != expected {
        return Err(VerificationError::Balance {
            stream: stream.clone(),
            expected,
            actual: account.balance,
        });
    }

    tracing::info!(
        stream = %stream,
        account_id = %account.aggregate_id(),
        balance = account.balance,
        version = account.version(),
        "✅ Stream verified"
    );
    Ok(account)
}
