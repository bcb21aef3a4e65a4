use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod connection;
mod domain;
mod errors;
mod event_sourcing;
mod workflow;

use cli::{Cli, Settings};
use errors::AppError;
use event_sourcing::EsdbEventStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    // Logs go to stderr so stdout carries only the stream output.
    // Override with RUST_LOG, e.g. RUST_LOG=esdb_account_stream=trace
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,esdb_account_stream=debug")),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(stage = %e.stage(), error = %e, "❌ Run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = Settings::try_from(cli)?;
    tracing::info!("🚀 Starting EventStoreDB account stream demo");

    // === 1. Resolve certificates into the connection string ===
    let connection_string =
        connection::resolve_connection_string(&settings.connection_string, &settings.cert_folder)?;
    connection::check_certificate_files(&connection_string)?;
    let client_settings = connection::build_client_settings(&connection_string)?;

    // === 2. Create the client ===
    tracing::info!("Creating EventStoreDB client...");
    let store = EsdbEventStore::connect(client_settings)
        .map_err(|e| AppError::ClientCreation(format!("{e:#}")))?;

    // === 3. Write, then read back ===
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    workflow::run(&store, &settings.run, &mut out).await?;

    Ok(())
}
