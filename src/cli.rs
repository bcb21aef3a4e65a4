use std::path::PathBuf;

use clap::Parser;

use crate::errors::AppError;
use crate::workflow::{OutputFormat, RunOptions};

/// Append an account's lifecycle to a new EventStoreDB stream, then read it back.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// EventStoreDB connection string carrying userCertFile, userKeyFile and tlsCaFile
    #[arg(env = "ESDB_CONNECTION_STRING")]
    pub connection_string: String,

    /// Folder the certificate file names are resolved against
    #[arg(env = "ESDB_CERT_FOLDER")]
    pub cert_folder: PathBuf,

    /// Number of account streams to write and read back
    #[arg(long, env = "ESDB_STREAMS", default_value_t = 1)]
    pub streams: usize,

    /// How event payloads are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Raw)]
    pub format: OutputFormat,

    /// Check every stream read back against what was appended
    #[arg(long)]
    pub verify: bool,
}

/// Validated, immutable run configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection_string: String,
    pub cert_folder: PathBuf,
    pub run: RunOptions,
}

impl TryFrom<Cli> for Settings {
    type Error = AppError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.connection_string.trim().is_empty() {
            return Err(AppError::Arguments("connection string is empty".to_string()));
        }
        if cli.streams == 0 {
            return Err(AppError::Arguments("--streams must be at least 1".to_string()));
        }
        if !cli.cert_folder.is_dir() {
            return Err(AppError::Arguments(format!(
                "certificate folder {} is not a directory",
                cli.cert_folder.display()
            )));
        }

        Ok(Self {
            connection_string: cli.connection_string,
            cert_folder: cli.cert_folder,
            run: RunOptions {
                streams: cli.streams,
                format: cli.format,
                verify: cli.verify,
            },
        })
    }
}
