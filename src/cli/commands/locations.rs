//! Locations command implementation
//!
//! Lists every known dam with its profile, reading count and date range.

use super::shared::{open_store, print_csv, print_json, print_no_data};
use crate::app::services::trend_query;
use crate::cli::args::{LocationsArgs, OutputFormat};
use crate::Result;
use chrono::NaiveDate;
use colored::*;
use serde::Serialize;

/// One row of the locations report
#[derive(Debug, Clone, Serialize)]
pub struct LocationRow {
    pub location: String,
    pub dam_shape: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cross_sectional_area: Option<f64>,
    pub readings: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

/// Locations command runner
pub fn run_locations(args: LocationsArgs) -> Result<()> {
    let config = args.common.resolve_config()?;
    let store = open_store(&config)?;
    let snapshot = store.snapshot();

    let rows: Vec<LocationRow> = store
        .profiles()
        .profiles()
        .into_iter()
        .map(|profile| {
            let readings = trend_query::filter_by_location(&snapshot, &profile.location);
            let range = trend_query::date_range(&readings);
            LocationRow {
                location: profile.location.clone(),
                dam_shape: profile.dam_shape.clone(),
                lat: profile.lat,
                lon: profile.lon,
                cross_sectional_area: profile.cross_sectional_area,
                readings: readings.len(),
                first_day: range.map(|(first, _)| first),
                last_day: range.map(|(_, last)| last),
            }
        })
        .collect();

    match args.common.output_format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_csv(&rows),
        OutputFormat::Human => {
            if rows.is_empty() {
                print_no_data("the reading log has no dams yet");
                return Ok(());
            }

            println!("{}", "Dam Locations".bright_green().bold());
            for row in &rows {
                let span = match (row.first_day, row.last_day) {
                    (Some(first), Some(last)) => format!("{} to {}", first, last),
                    _ => "undated".to_string(),
                };
                println!(
                    "  {:<20} {:<14} {:>6} readings  {}",
                    row.location.bright_white().bold(),
                    row.dam_shape.as_deref().unwrap_or("-"),
                    row.readings,
                    span
                );
            }
            Ok(())
        }
    }
}
