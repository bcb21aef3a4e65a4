use std::fmt;
use std::path::PathBuf;

use crate::event_sourcing::{ReplayError, StoreError};
use crate::domain::account::AccountError;

// ============================================================================
// Error Taxonomy
// ============================================================================
//
// One enum per failure class. Nothing below `main` decides how the process
// exits; every error travels back up as an `AppError`.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("failed to encode {event_type} payload: {source}")]
    Serialize {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {event_type} payload: {source}")]
    Deserialize {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown event type: {0}")]
    UnknownEventType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid connection string: {0}")]
    InvalidDescriptor(String),

    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("{0} parameter must not be empty")]
    EmptyParameter(&'static str),

    #[error("{parameter} file not found: {}", .path.display())]
    CertificateNotFound {
        parameter: &'static str,
        path: PathBuf,
    },

    #[error("invalid connection string: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("append of event {index} ({event_type}) to {stream} failed: {source}")]
    Append {
        stream: String,
        index: usize,
        event_type: &'static str,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("reading {stream} from revision {revision} failed: {source}")]
    Store {
        stream: String,
        revision: u64,
        #[source]
        source: StoreError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("{stream} holds {actual} events, expected {expected}")]
    EventCount {
        stream: String,
        expected: usize,
        actual: usize,
    },

    #[error("{stream} revision {revision} has type {actual}, expected {expected}")]
    EventType {
        stream: String,
        revision: u64,
        expected: &'static str,
        actual: String,
    },

    #[error("{stream} revision {revision} does not match the appended event")]
    Payload { stream: String, revision: u64 },

    #[error("{stream} revision {revision} could not be decoded: {source}")]
    Decode {
        stream: String,
        revision: u64,
        #[source]
        source: EncodingError,
    },

    #[error("replaying {stream} failed: {source}")]
    Replay {
        stream: String,
        #[source]
        source: ReplayError<AccountError>,
    },

    #[error("{stream} replays to balance {actual}, expected {expected}")]
    Balance {
        stream: String,
        expected: i64,
        actual: i64,
    },
}

/// Linear stages of a run, used to label the failure diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateArgs,
    BuildConfig,
    CreateClient,
    WriteStream,
    ReadStream,
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidateArgs => "validate arguments",
            Stage::BuildConfig => "build configuration",
            Stage::CreateClient => "create client",
            Stage::WriteStream => "write stream",
            Stage::ReadStream => "read stream",
            Stage::Verify => "verify stream",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid arguments: {0}")]
    Arguments(String),

    #[error("error validating connection string: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("error creating event store client: {0}")]
    ClientCreation(String),

    #[error("error writing stream: {0}")]
    Write(#[from] WriteError),

    #[error("error reading stream: {0}")]
    Read(#[from] ReadError),

    #[error("error verifying stream: {0}")]
    Verification(#[from] VerificationError),
}

impl AppError {
    pub fn stage(&self) -> Stage {
        match self {
            AppError::Arguments(_) => Stage::ValidateArgs,
            AppError::Configuration(_) => Stage::BuildConfig,
            AppError::ClientCreation(_) => Stage::CreateClient,
            AppError::Write(_) => Stage::WriteStream,
            AppError::Read(_) => Stage::ReadStream,
            AppError::Verification(_) => Stage::Verify,
        }
    }
}
