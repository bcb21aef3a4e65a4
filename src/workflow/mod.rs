// ============================================================================
// Workflow - Write Then Read
// ============================================================================
//
// For each requested stream: append a fresh account lifecycle, print the
// stream name, read the stream back and print it, optionally verify it.
// Streams are processed one after another on the same store handle.
//
// ============================================================================

pub mod reader;
pub mod verify;
pub mod writer;

use std::io::Write;
use std::time::{Duration, Instant};

use crate::errors::{AppError, ReadError};
use crate::event_sourcing::EventStore;

pub use reader::{print_stream, OutputFormat};
pub use verify::verify_stream;
pub use writer::write_stream;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of account streams to write and read back
    pub streams: usize,
    pub format: OutputFormat,
    pub verify: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            streams: 1,
            format: OutputFormat::Raw,
            verify: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub stream_names: Vec<String>,
    pub events_written: usize,
    pub events_read: usize,
    pub write_time: Duration,
}

pub async fn run<S, W>(store: &S, options: &RunOptions, out: &mut W) -> Result<RunSummary, AppError>
where
    S: EventStore + ?Sized,
    W: Write,
{
    let started = Instant::now();
    let mut summary = RunSummary::default();

    for _ in 0..options.streams {
        let write_started = Instant::now();
        let written = write_stream(store).await?;
        summary.write_time += write_started.elapsed();
        summary.events_written += written.events.len();

        writeln!(out, "Stream Name: {}", written.stream_name).map_err(ReadError::from)?;
        let recorded = print_stream(store, &written.stream_name, out, options.format).await?;
        summary.events_read += recorded.len();

        if options.verify {
            verify_stream(&written, &recorded)?;
        }
        summary.stream_names.push(written.stream_name);
    }

    tracing::info!(
        streams = summary.stream_names.len(),
        events_written = summary.events_written,
        events_read = summary.events_read,
        write_time_ms = summary.write_time.as_millis() as u64,
        total_time_ms = started.elapsed().as_millis() as u64,
        "🎉 Run complete"
    );

    Ok(summary)
}
