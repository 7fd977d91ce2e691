//! Application constants for damflow
//!
//! This module contains the log column names, accepted timestamp formats,
//! default values and validation ranges used throughout the crate.

// =============================================================================
// Reading Log Columns
// =============================================================================

/// Column names of the persisted reading log
pub mod columns {
    pub const DATE_RECORDED: &str = "date_recorded";
    pub const INITIAL_WATER_LEVEL: &str = "initial_water_level";
    pub const FINAL_WATER_LEVEL: &str = "final_water_level";
    pub const DAM_SHAPE: &str = "dam_shape";
    pub const DAM_LOCATION: &str = "dam_location";
    pub const DAM_LAT_COORDS: &str = "dam_lat_coords";
    pub const DAM_LONG_COORDS: &str = "dam_long_coords";
    pub const CROSS_SECTIONAL_AREA: &str = "cross_sectional_area";
    pub const RATE_OF_FLOW: &str = "rate_of_flow";

    /// Header row in canonical write order
    pub const HEADER: &[&str] = &[
        DATE_RECORDED,
        INITIAL_WATER_LEVEL,
        FINAL_WATER_LEVEL,
        DAM_SHAPE,
        DAM_LOCATION,
        DAM_LAT_COORDS,
        DAM_LONG_COORDS,
        CROSS_SECTIONAL_AREA,
        RATE_OF_FLOW,
    ];
}

// =============================================================================
// Timestamp Formats
// =============================================================================

/// Date-only format (`2024-01-31`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time formats accepted when reading the log, tried in order.
/// `%.f` accepts an absent fractional part.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-time format used when writing the log
pub const DATETIME_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// =============================================================================
// Defaults
// =============================================================================

/// File name of the reading log inside the data directory
pub const DEFAULT_LOG_FILE_NAME: &str = "water_flow_data.csv";

/// Application directory name under the platform data/config dirs
pub const APP_DIR_NAME: &str = "damflow";

/// Configuration file name under the platform config dir
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Calibration factor applied to the level difference when estimating flow
pub const DEFAULT_FLOW_FACTOR: f64 = 1.0;

// =============================================================================
// Validation Ranges
// =============================================================================

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
