//! Trend queries over reading snapshots
//!
//! Pure, side-effect-free filters and aggregations used by the dashboard:
//! location/month/window filters, daily, hourly and monthly grouping, averages,
//! last-value-and-delta and exact-day lookups. Every function takes a
//! [`Snapshot`] by reference and never touches the store.
//!
//! Ordering is always by timestamp ascending; readings sharing a timestamp keep
//! their insertion order, so the one appended later sorts later. Undated
//! readings are ignored by everything that needs a date.

use crate::app::models::{Month, Reading};
use crate::app::services::reading_store::Snapshot;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub mod filters;
pub mod grouping;
pub mod metrics;

#[cfg(test)]
pub mod tests;

pub use filters::{filter_by_location, filter_by_month, filter_by_window};
pub use grouping::{group_by_day, group_by_hour, group_by_month};
pub use metrics::{
    average_rate_of_flow, date_range, flow_series, last_and_delta, latest_on, months,
};

/// Mean rate of flow for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFlow {
    pub day: NaiveDate,
    pub mean_rate_of_flow: f64,
    /// Number of readings averaged
    pub samples: usize,
}

/// Mean rate of flow for one hour (0-23) of a day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyFlow {
    pub hour: u32,
    pub mean_rate_of_flow: f64,
    pub samples: usize,
}

/// Readings of one calendar month, in trend order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReadings {
    pub month: Month,
    pub readings: Vec<Reading>,
}

/// One point of a rate-of-flow time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPoint {
    pub at: NaiveDateTime,
    pub rate_of_flow: f64,
}

/// Latest rate of flow and its change from the previous reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowChange {
    /// No dated readings at all
    NoData,
    /// Exactly one dated reading; there is nothing to compare against
    Single { last: f64 },
    /// At least two dated readings
    Change { last: f64, previous: f64, delta: f64 },
}

impl FlowChange {
    pub fn last(&self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Single { last } | Self::Change { last, .. } => Some(*last),
        }
    }

    pub fn delta(&self) -> Option<f64> {
        match self {
            Self::Change { delta, .. } => Some(*delta),
            _ => None,
        }
    }
}

/// Result of looking up the rate of flow on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayLookup {
    Found {
        rate_of_flow: f64,
        recorded_at: NaiveDateTime,
    },
    NotFound,
}

impl DayLookup {
    pub fn rate_of_flow(&self) -> Option<f64> {
        match self {
            Self::Found { rate_of_flow, .. } => Some(*rate_of_flow),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Dated readings with their timestamps in trend order
///
/// `sort_by_key` is stable, which gives the insertion-order tie-break.
pub(crate) fn dated_in_order(snapshot: &Snapshot) -> Vec<(NaiveDateTime, &Reading)> {
    let mut dated: Vec<(NaiveDateTime, &Reading)> = snapshot
        .iter()
        .filter_map(|reading| reading.timestamp().map(|ts| (ts, reading)))
        .collect();
    dated.sort_by_key(|(ts, _)| *ts);
    dated
}

/// Arithmetic mean accumulator
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}
