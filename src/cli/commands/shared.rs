//! Shared components for CLI commands
//!
//! This module contains logging setup, store opening and the output helpers
//! used across the command implementations.

use crate::app::services::reading_store::ReadingStore;
use crate::cli::args::CommonArgs;
use crate::config::DamFlowConfig;
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use tracing::{debug, info};

/// Set up structured logging for all commands
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("damflow={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Open the configured reading log, which must already exist
pub fn open_store(config: &DamFlowConfig) -> Result<ReadingStore> {
    info!("Opening reading log at {}", config.data_path.display());
    let store = ReadingStore::open(&config.data_path)?;

    if store.load_report().has_issues() {
        eprintln!(
            "{} {} rows in {} were rejected; run `damflow validate` for details",
            "warning:".yellow().bold(),
            store.load_report().rejected(),
            config.data_path.display()
        );
    }

    Ok(store)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization("Failed to encode JSON output", e))?;
    println!("{}", text);
    Ok(())
}

/// Print rows as CSV with a header on stdout
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::csv_parsing("stdout", "Failed to write CSV output", Some(e)))?;
    }
    writer
        .flush()
        .map_err(|e| Error::io("Failed to flush CSV output", e))?;
    Ok(())
}

/// Format a rate of flow for display
pub fn format_flow(value: f64) -> String {
    format!("{:.2} m³/s", value)
}

/// Format a signed change in rate of flow for display
pub fn format_delta(delta: f64) -> ColoredString {
    let text = format!("{:+.2} m³/s", delta);
    if delta > 0.0 {
        text.green()
    } else if delta < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

/// Informational "nothing to show" line, distinct from errors
pub fn print_no_data(message: &str) {
    println!("{} {}", "no data:".yellow(), message);
}
