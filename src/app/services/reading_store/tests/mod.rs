//! Shared test utilities and fixtures for reading store tests

use crate::app::models::{DamProfile, Reading, RecordedAt};
use std::fs;
use std::path::{Path, PathBuf};


/// Header line of the reading log
pub const HEADER_LINE: &str = "date_recorded,initial_water_level,final_water_level,dam_shape,dam_location,dam_lat_coords,dam_long_coords,cross_sectional_area,rate_of_flow";

/// Create a test profile with standard attributes
pub fn create_test_profile(location: &str) -> DamProfile {
    DamProfile::new(location)
        .with_shape("trapezoidal")
        .with_coordinates(10.0, 20.0)
        .with_cross_sectional_area(5.0)
}

/// Create a test reading for a location at a timestamp text
pub fn create_test_reading(recorded_at: &str, location: &str, rate_of_flow: f64) -> Reading {
    Reading {
        recorded_at: RecordedAt::parse(recorded_at),
        initial_level: 300.0,
        final_level: 800.0,
        rate_of_flow,
        profile: create_test_profile(location),
    }
}

/// Write a log file with the standard header followed by `rows`
pub fn create_test_log(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("water_flow_data.csv");
    let mut content = String::from(HEADER_LINE);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}
