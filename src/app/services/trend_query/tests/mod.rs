//! Tests for trend queries
//!
//! Snapshots are built in memory; no log file is involved.

use crate::app::models::{DamProfile, Reading, RecordedAt};
use crate::app::services::reading_store::Snapshot;

pub mod filters_tests;

/// Create a reading for `location` recorded at `recorded_at` (any log timestamp text)
pub fn reading(recorded_at: &str, location: &str, rate_of_flow: f64) -> Reading {
    Reading {
        recorded_at: RecordedAt::parse(recorded_at),
        initial_level: 300.0,
        final_level: 800.0,
        rate_of_flow,
        profile: DamProfile::new(location)
            .with_shape("trapezoidal")
            .with_coordinates(10.0, 20.0)
            .with_cross_sectional_area(5.0),
    }
}

/// Snapshot of `readings` in the given insertion order
pub fn snapshot_of(readings: Vec<Reading>) -> Snapshot {
    Snapshot::new(1, readings)
}

/// Mixed two-location snapshot spanning two months
pub fn create_sample_snapshot() -> Snapshot {
    snapshot_of(vec![
        reading("2024-01-01 09:00:00", "A", 50.0),
        reading("2024-01-01 17:00:00", "A", 70.0),
        reading("2024-01-02 10:00:00", "B", 30.0),
        reading("2024-01-03 08:00:00", "A", 65.0),
        reading("garbled", "A", 999.0),
        reading("2024-02-10 12:00:00", "A", 80.0),
        reading("2024-02-11 12:00:00", "B", 20.0),
    ])
}
