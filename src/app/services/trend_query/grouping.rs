//! Calendar grouping of readings
//!
//! Groups are keyed with ordered maps so output is always ascending; a period
//! with no readings simply does not appear.

use super::{DailyFlow, HourlyFlow, Mean, MonthlyReadings, dated_in_order};
use crate::app::models::Month;
use crate::app::services::reading_store::Snapshot;
use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;
use tracing::debug;

/// Mean rate of flow per calendar day, ascending by day
pub fn group_by_day(snapshot: &Snapshot) -> Vec<DailyFlow> {
    let mut days: BTreeMap<NaiveDate, Mean> = BTreeMap::new();

    for reading in snapshot {
        if let Some(day) = reading.date() {
            days.entry(day).or_default().add(reading.rate_of_flow);
        }
    }

    debug!("Grouped {} readings into {} days", snapshot.len(), days.len());

    days.into_iter()
        .filter_map(|(day, mean)| {
            mean.value().map(|mean_rate_of_flow| DailyFlow {
                day,
                mean_rate_of_flow,
                samples: mean.count(),
            })
        })
        .collect()
}

/// Readings per calendar month, ascending by month
///
/// Readings inside each month are in trend order (timestamp, then insertion).
pub fn group_by_month(snapshot: &Snapshot) -> Vec<MonthlyReadings> {
    let mut months: BTreeMap<Month, Vec<_>> = BTreeMap::new();

    for (ts, reading) in dated_in_order(snapshot) {
        months
            .entry(Month::of(ts.date()))
            .or_default()
            .push(reading.clone());
    }

    months
        .into_iter()
        .map(|(month, readings)| MonthlyReadings { month, readings })
        .collect()
}

/// Mean rate of flow per hour of one calendar day, ascending by hour
///
/// Date-only readings count towards hour 0.
pub fn group_by_hour(snapshot: &Snapshot, day: NaiveDate) -> Vec<HourlyFlow> {
    let mut hours: BTreeMap<u32, Mean> = BTreeMap::new();

    for reading in snapshot {
        if let Some(ts) = reading.timestamp().filter(|ts| ts.date() == day) {
            hours.entry(ts.hour()).or_default().add(reading.rate_of_flow);
        }
    }

    hours
        .into_iter()
        .filter_map(|(hour, mean)| {
            mean.value().map(|mean_rate_of_flow| HourlyFlow {
                hour,
                mean_rate_of_flow,
                samples: mean.count(),
            })
        })
        .collect()
}
