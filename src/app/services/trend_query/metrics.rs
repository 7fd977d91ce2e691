//! Scalar metrics and series over snapshots

use super::{DayLookup, FlowChange, FlowPoint, Mean, dated_in_order};
use crate::app::models::Month;
use crate::app::services::reading_store::Snapshot;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Latest rate of flow and its change from the one before it
pub fn last_and_delta(snapshot: &Snapshot) -> FlowChange {
    let dated = dated_in_order(snapshot);

    match dated.as_slice() {
        [] => FlowChange::NoData,
        [(_, only)] => FlowChange::Single {
            last: only.rate_of_flow,
        },
        [.., (_, previous), (_, last)] => FlowChange::Change {
            last: last.rate_of_flow,
            previous: previous.rate_of_flow,
            delta: last.rate_of_flow - previous.rate_of_flow,
        },
    }
}

/// Latest rate of flow recorded on a calendar day
pub fn latest_on(snapshot: &Snapshot, date: NaiveDate) -> DayLookup {
    dated_in_order(snapshot)
        .into_iter()
        .rev()
        .find(|(ts, _)| ts.date() == date)
        .map(|(recorded_at, reading)| DayLookup::Found {
            rate_of_flow: reading.rate_of_flow,
            recorded_at,
        })
        .unwrap_or(DayLookup::NotFound)
}

/// Arithmetic mean rate of flow over all readings, `None` when empty
///
/// Undated readings are included; their flow is still a measurement.
pub fn average_rate_of_flow(snapshot: &Snapshot) -> Option<f64> {
    let mut mean = Mean::default();
    for reading in snapshot {
        mean.add(reading.rate_of_flow);
    }
    mean.value()
}

/// Distinct months with dated readings, ascending
pub fn months(snapshot: &Snapshot) -> Vec<Month> {
    snapshot
        .iter()
        .filter_map(|reading| reading.date())
        .map(Month::of)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Earliest and latest day with a dated reading
pub fn date_range(snapshot: &Snapshot) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = snapshot.iter().filter_map(|reading| reading.date());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}

/// Every dated reading as a time series point, in trend order
pub fn flow_series(snapshot: &Snapshot) -> Vec<FlowPoint> {
    dated_in_order(snapshot)
        .into_iter()
        .map(|(at, reading)| FlowPoint {
            at,
            rate_of_flow: reading.rate_of_flow,
        })
        .collect()
}
