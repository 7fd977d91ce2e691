//! Record command implementation
//!
//! Builds a reading from entered water levels, fills the static attributes
//! from the dam's registered profile, and appends it to the log.

use super::shared::{format_flow, print_csv, print_json};
use crate::app::models::{DamProfile, Reading};
use crate::app::services::flow_rate::{FlowRateEstimator, LevelDifferenceEstimator};
use crate::app::services::reading_store::ReadingStore;
use crate::cli::args::{OutputFormat, RecordArgs};
use crate::Result;
use colored::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Recorded reading as one flat CSV row
#[derive(Debug, Clone, Serialize)]
pub struct RecordedRow {
    pub date_recorded: String,
    pub initial_water_level: f64,
    pub final_water_level: f64,
    pub dam_shape: Option<String>,
    pub dam_location: String,
    pub dam_lat_coords: Option<f64>,
    pub dam_long_coords: Option<f64>,
    pub cross_sectional_area: Option<f64>,
    pub rate_of_flow: f64,
}

impl From<&Reading> for RecordedRow {
    fn from(reading: &Reading) -> Self {
        Self {
            date_recorded: reading.recorded_at.to_string(),
            initial_water_level: reading.initial_level,
            final_water_level: reading.final_level,
            dam_shape: reading.profile.dam_shape.clone(),
            dam_location: reading.profile.location.clone(),
            dam_lat_coords: reading.profile.lat,
            dam_long_coords: reading.profile.lon,
            cross_sectional_area: reading.profile.cross_sectional_area,
            rate_of_flow: reading.rate_of_flow,
        }
    }
}

/// Record command runner
pub fn run_record(args: RecordArgs) -> Result<()> {
    debug!("Record arguments: {:?}", args);

    let config = args.common.resolve_config()?;
    let mut store = ReadingStore::open_or_create(&config.data_path)?;

    let profile = resolve_profile(&store, &args);

    let rate_of_flow = match args.rate_of_flow {
        Some(rate) => rate,
        None => {
            let estimator =
                LevelDifferenceEstimator::new(args.factor.unwrap_or(config.flow_factor))?;
            estimator.estimate(args.initial_level, args.final_level)?
        }
    };

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let reading = Reading::new(
        date,
        profile,
        args.initial_level,
        args.final_level,
        rate_of_flow,
    )?;

    store.append(reading.clone())?;
    info!("Recorded reading for '{}' on {}", reading.location(), date);

    match args.common.output_format {
        OutputFormat::Json => print_json(&reading),
        OutputFormat::Csv => print_csv(&[RecordedRow::from(&reading)]),
        OutputFormat::Human => {
            println!(
                "{} Data recorded for {} on {}",
                "✓".bright_green().bold(),
                reading.location(),
                reading.recorded_at
            );
            println!(
                "  Levels: {} m -> {} m, rate of flow {}",
                reading.initial_level,
                reading.final_level,
                format_flow(reading.rate_of_flow)
            );
            Ok(())
        }
    }
}

/// Static attributes for the new reading
///
/// Known dams start from their registered profile; attributes given on the
/// command line are applied on top, so a conflicting value surfaces as a
/// consistency error from the store instead of being dropped.
fn resolve_profile(store: &ReadingStore, args: &RecordArgs) -> DamProfile {
    let location = args.location.trim();
    let mut profile = match store.profile(location) {
        Some(known) => known.clone(),
        None => {
            if args.shape.is_none() && args.lat.is_none() && args.area.is_none() {
                warn!(
                    "'{}' is a new location and no profile attributes were given",
                    location
                );
            }
            DamProfile::new(location)
        }
    };

    if let Some(shape) = &args.shape {
        profile.dam_shape = Some(shape.clone());
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        profile.lat = Some(lat);
        profile.lon = Some(lon);
    }
    if let Some(area) = args.area {
        profile.cross_sectional_area = Some(area);
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::columns;
    use chrono::NaiveDate;

    #[test]
    fn test_recorded_row_matches_log_columns() {
        let reading = Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            DamProfile::new("A").with_shape("trapezoidal"),
            300.0,
            800.0,
            500.0,
        )
        .unwrap();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(RecordedRow::from(&reading)).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut lines = output.lines();
        assert_eq!(lines.next(), Some(columns::HEADER.join(",").as_str()));
        assert_eq!(lines.next(), Some("2024-01-05,300.0,800.0,trapezoidal,A,,,,500.0"));
    }
}
