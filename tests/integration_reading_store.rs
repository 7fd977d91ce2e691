//! Integration tests for the reading store and trend queries
//!
//! These tests drive the public API end to end against a log file in a
//! temporary directory: append, reload, and query.

use chrono::NaiveDate;
use damflow::app::services::trend_query::{self, FlowChange};
use damflow::{DamProfile, Month, Reading, ReadingStore};
use tempfile::TempDir;

fn trapezoidal(location: &str) -> DamProfile {
    DamProfile::new(location)
        .with_shape("trapezoidal")
        .with_coordinates(10.0, 20.0)
        .with_cross_sectional_area(5.0)
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Appended readings survive a reload from disk
///
/// Purpose: Validate the log file written by append is read back identically
/// Benefit: Ensures a fresh process sees exactly what a previous one recorded
#[test]
fn test_append_then_reopen_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("water_flow_data.csv");

    let mut store = ReadingStore::open_or_create(&path).unwrap();
    let first = Reading::new(day(2024, 1, 1), trapezoidal("Dam A"), 300.0, 800.0, 50.0).unwrap();
    let second = Reading::new(day(2024, 1, 2), trapezoidal("Dam A"), 800.0, 750.0, -50.0).unwrap();
    store.append(first.clone()).unwrap();
    store.append(second.clone()).unwrap();

    let reopened = ReadingStore::open(&path).unwrap();
    let snapshot = reopened.snapshot();
    assert_eq!(snapshot.readings(), &[first, second]);
    assert!(!reopened.load_report().has_issues());
    assert_eq!(reopened.profile("Dam A"), Some(&trapezoidal("Dam A")));
}

/// A second shape for a known dam is refused and nothing is written
///
/// Purpose: Validate per-location profile consistency across appends
/// Benefit: Ensures the log never holds two profiles for one dam
#[test]
fn test_conflicting_shape_is_consistency_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("water_flow_data.csv");

    let mut store = ReadingStore::open_or_create(&path).unwrap();
    store
        .append(Reading::new(day(2024, 3, 1), trapezoidal("B"), 1.0, 2.0, 1.0).unwrap())
        .unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let rectangular = trapezoidal("B").with_shape("rectangular");
    let err = store
        .append(Reading::new(day(2024, 3, 2), rectangular, 2.0, 3.0, 1.0).unwrap())
        .unwrap_err();

    assert!(err.is_consistency());
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

/// Dashboard-style queries over a freshly written log
///
/// Purpose: Validate filtering, grouping and change metrics over stored data
/// Benefit: Ensures the query layer agrees with what the store persisted
#[test]
fn test_month_queries_over_stored_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("water_flow_data.csv");
    std::fs::write(
        &path,
        "date_recorded,initial_water_level,final_water_level,dam_shape,dam_location,dam_lat_coords,dam_long_coords,cross_sectional_area,rate_of_flow\n\
         2024-01-01 09:00:00,300,800,trapezoidal,Dam A,10,20,5,50\n\
         2024-01-01 17:00:00,800,900,trapezoidal,Dam A,10,20,5,70\n\
         2024-01-03 08:00:00,900,950,trapezoidal,Dam A,10,20,5,65\n\
         2024-02-10 12:00:00,950,900,trapezoidal,Dam A,10,20,5,80\n",
    )
    .unwrap();

    let store = ReadingStore::open(&path).unwrap();
    let dam_a = trend_query::filter_by_location(&store.snapshot(), "Dam A");
    let january = trend_query::filter_by_month(&dam_a, Month::new(2024, 1).unwrap());

    let daily = trend_query::group_by_day(&january);
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].day, day(2024, 1, 1));
    assert!((daily[0].mean_rate_of_flow - 60.0).abs() < 1e-9);
    assert_eq!(daily[0].samples, 2);

    match trend_query::last_and_delta(&january) {
        FlowChange::Change { last, previous, delta } => {
            assert_eq!(last, 65.0);
            assert_eq!(previous, 70.0);
            assert_eq!(delta, -5.0);
        }
        other => panic!("expected a change, got {:?}", other),
    }

    assert_eq!(
        trend_query::months(&dam_a),
        vec![Month::new(2024, 1).unwrap(), Month::new(2024, 2).unwrap()]
    );
    assert_eq!(
        trend_query::date_range(&dam_a),
        Some((day(2024, 1, 1), day(2024, 2, 10)))
    );
}
