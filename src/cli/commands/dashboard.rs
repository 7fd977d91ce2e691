//! Dashboard command implementation
//!
//! Summarises one dam for a month (average, latest change, daily means) or
//! breaks a single day down by hour.

use super::shared::{format_delta, format_flow, open_store, print_csv, print_json, print_no_data};
use crate::app::models::Month;
use crate::app::services::trend_query::{
    self, DailyFlow, DayLookup, FlowChange, HourlyFlow,
};
use crate::cli::args::{DashboardArgs, OutputFormat};
use crate::Result;
use chrono::NaiveDate;
use colored::*;
use serde::Serialize;
use tracing::{debug, info};

/// Month view of one dam
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub location: String,
    pub month: Month,
    pub average_rate_of_flow: Option<f64>,
    pub change: FlowChange,
    pub daily: Vec<DailyFlow>,
    pub coordinates: Option<(f64, f64)>,
}

/// Single-day view of one dam
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub location: String,
    pub day: NaiveDate,
    pub latest: DayLookup,
    pub hourly: Vec<HourlyFlow>,
    pub coordinates: Option<(f64, f64)>,
}

/// Dashboard command runner
pub fn run_dashboard(args: DashboardArgs) -> Result<()> {
    debug!("Dashboard arguments: {:?}", args);

    let config = args.common.resolve_config()?;
    let store = open_store(&config)?;
    let by_location = trend_query::filter_by_location(&store.snapshot(), &args.location);
    let coordinates = store
        .profile(&args.location)
        .and_then(|profile| profile.coordinates());

    info!(
        "Dashboard for '{}': {} readings",
        args.location,
        by_location.len()
    );

    if let Some(day) = args.day {
        let summary = DaySummary {
            location: args.location.clone(),
            day,
            latest: trend_query::latest_on(&by_location, day),
            hourly: trend_query::group_by_hour(&by_location, day),
            coordinates,
        };
        return render_day(&summary, args.common.output_format);
    }

    let month = match args
        .month
        .or_else(|| trend_query::months(&by_location).last().copied())
    {
        Some(month) => month,
        None => {
            print_no_data(&format!("no dated readings for '{}'", args.location));
            return Ok(());
        }
    };

    let month_data = trend_query::filter_by_month(&by_location, month);
    let summary = MonthSummary {
        location: args.location.clone(),
        month,
        average_rate_of_flow: trend_query::average_rate_of_flow(&month_data),
        change: trend_query::last_and_delta(&month_data),
        daily: trend_query::group_by_day(&month_data),
        coordinates,
    };

    render_month(&summary, args.common.output_format)
}

fn render_month(summary: &MonthSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Csv => print_csv(&summary.daily),
        OutputFormat::Human => {
            println!(
                "{}",
                format!(
                    "Rate of Flow Trends for {} in {}",
                    summary.location, summary.month
                )
                .bright_green()
                .bold()
            );

            let Some(average) = summary.average_rate_of_flow else {
                print_no_data("no readings for the selected month");
                return Ok(());
            };
            println!("  Average rate of flow: {}", format_flow(average).bright_white().bold());

            match summary.change {
                FlowChange::Change { last, delta, .. } => println!(
                    "  Last rate of flow:    {} ({})",
                    format_flow(last).bright_white().bold(),
                    format_delta(delta)
                ),
                FlowChange::Single { last } => {
                    println!("  Last rate of flow:    {}", format_flow(last));
                    print_no_data("not enough data to calculate change");
                }
                FlowChange::NoData => print_no_data("not enough data to calculate change"),
            }

            println!();
            println!("  {:<12} {:>14} {:>8}", "Day", "Mean flow", "Samples");
            for daily in &summary.daily {
                println!(
                    "  {:<12} {:>14} {:>8}",
                    daily.day.to_string(),
                    format_flow(daily.mean_rate_of_flow),
                    daily.samples
                );
            }

            print_location(summary.coordinates);
            Ok(())
        }
    }
}

fn render_day(summary: &DaySummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Csv => print_csv(&summary.hourly),
        OutputFormat::Human => {
            println!(
                "{}",
                format!(
                    "Rate of Flow Trends for {} on {}",
                    summary.location, summary.day
                )
                .bright_green()
                .bold()
            );

            match &summary.latest {
                DayLookup::Found {
                    rate_of_flow,
                    recorded_at,
                } => println!(
                    "  Latest rate of flow: {} (at {})",
                    format_flow(*rate_of_flow).bright_white().bold(),
                    recorded_at.format("%H:%M:%S")
                ),
                DayLookup::NotFound => {
                    print_no_data("no readings for the selected day");
                    return Ok(());
                }
            }

            println!();
            println!("  {:<6} {:>14} {:>8}", "Hour", "Mean flow", "Samples");
            for hourly in &summary.hourly {
                println!(
                    "  {:<6} {:>14} {:>8}",
                    format!("{:02}:00", hourly.hour),
                    format_flow(hourly.mean_rate_of_flow),
                    hourly.samples
                );
            }

            print_location(summary.coordinates);
            Ok(())
        }
    }
}

fn print_location(coordinates: Option<(f64, f64)>) {
    println!();
    match coordinates {
        Some((lat, lon)) => println!("  Location: {:.4}, {:.4}", lat, lon),
        None => print_no_data("location data not available for the selected dam"),
    }
}
