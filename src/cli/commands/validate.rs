//! Validate command implementation
//!
//! Loads the reading log and prints the load report, listing every rejected
//! row with its line number.

use crate::app::services::reading_store::ReadingStore;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use tracing::info;

use super::shared::{print_csv, print_json};

/// One rejected row, flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct IssueRow {
    pub line: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Validate command runner
pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let config = args.common.resolve_config()?;
    let store = ReadingStore::open(&config.data_path)?;
    let report = store.load_report();

    info!("Validated {}: {}", config.data_path.display(), report.summary());

    let rows: Vec<IssueRow> = report
        .issues
        .iter()
        .map(|issue| IssueRow {
            line: issue.line,
            kind: if issue.error.is_consistency() {
                "consistency"
            } else {
                "validation"
            },
            message: issue.error.to_string(),
        })
        .collect();

    match args.common.output_format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Human => {
            println!("{}", "Reading Log Validation".bright_green().bold());
            println!("  {}", report.summary());
            println!("  Locations: {}", store.profiles().len());

            if rows.is_empty() {
                println!("  {}", "No rejected rows".bright_green());
            }
            for row in &rows {
                println!(
                    "  {} line {}: {}",
                    row.kind.yellow(),
                    row.line,
                    row.message
                );
            }
        }
    }

    if args.strict && report.has_issues() {
        return Err(Error::validation(format!(
            "{} rows rejected in {}",
            report.rejected(),
            config.data_path.display()
        )));
    }

    Ok(())
}
