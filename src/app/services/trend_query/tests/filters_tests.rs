//! Tests for snapshot filters

use super::*;
use crate::app::models::Month;
use crate::app::services::trend_query::{filter_by_location, filter_by_month, filter_by_window};
use chrono::NaiveDate;

#[test]
fn test_filter_by_location_preserves_order() {
    let snapshot = create_sample_snapshot();
    let filtered = filter_by_location(&snapshot, "A");

    let flows: Vec<f64> = filtered.iter().map(|r| r.rate_of_flow).collect();
    assert_eq!(flows, vec![50.0, 70.0, 65.0, 999.0, 80.0]);
    assert_eq!(filtered.version(), snapshot.version());
}

#[test]
fn test_filter_by_unknown_location_is_empty() {
    let snapshot = create_sample_snapshot();
    let filtered = filter_by_location(&snapshot, "Nowhere");
    assert!(filtered.is_empty());
}

#[test]
fn test_filter_by_month_excludes_undated() {
    let snapshot = create_sample_snapshot();
    let january: Month = "2024-01".parse().unwrap();

    let filtered = filter_by_month(&filter_by_location(&snapshot, "A"), january);

    let flows: Vec<f64> = filtered.iter().map(|r| r.rate_of_flow).collect();
    assert_eq!(flows, vec![50.0, 70.0, 65.0]);
}

#[test]
fn test_filter_by_window_inclusive_bounds() {
    let snapshot = create_sample_snapshot();
    let since = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap();
    let until = NaiveDate::from_ymd_opt(2024, 1, 3)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();

    let filtered = filter_by_window(&snapshot, Some(since), Some(until));
    let flows: Vec<f64> = filtered.iter().map(|r| r.rate_of_flow).collect();
    assert_eq!(flows, vec![70.0, 30.0, 65.0]);
}

#[test]
fn test_filter_by_window_open_bounds() {
    let snapshot = create_sample_snapshot();
    let since = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    assert_eq!(filter_by_window(&snapshot, Some(since), None).len(), 2);
    // Without bounds only undated readings are dropped
    assert_eq!(filter_by_window(&snapshot, None, None).len(), 6);
}
