//! Snapshot filters
//!
//! Each filter returns a new snapshot of the same version holding the matching
//! readings in their original order.

use crate::app::models::Month;
use crate::app::services::reading_store::Snapshot;
use chrono::NaiveDateTime;

/// All readings for one dam location
pub fn filter_by_location(snapshot: &Snapshot, location: &str) -> Snapshot {
    snapshot.derive(
        snapshot
            .iter()
            .filter(|reading| reading.location() == location)
            .cloned()
            .collect(),
    )
}

/// Dated readings that fall in a calendar month
pub fn filter_by_month(snapshot: &Snapshot, month: Month) -> Snapshot {
    snapshot.derive(
        snapshot
            .iter()
            .filter(|reading| reading.date().is_some_and(|date| month.contains(date)))
            .cloned()
            .collect(),
    )
}

/// Dated readings inside an inclusive time window; open bounds are unbounded
pub fn filter_by_window(
    snapshot: &Snapshot,
    since: Option<NaiveDateTime>,
    until: Option<NaiveDateTime>,
) -> Snapshot {
    snapshot.derive(
        snapshot
            .iter()
            .filter(|reading| {
                reading.timestamp().is_some_and(|ts| {
                    since.is_none_or(|start| ts >= start) && until.is_none_or(|end| ts <= end)
                })
            })
            .cloned()
            .collect(),
    )
}
