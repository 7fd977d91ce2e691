//! Trends command implementation
//!
//! Prints the rate-of-flow history of one dam, optionally windowed by date
//! and collapsed to daily means.

use super::shared::{format_flow, open_store, print_csv, print_json, print_no_data};
use crate::app::services::trend_query;
use crate::cli::args::{OutputFormat, TrendsArgs};
use crate::Result;
use chrono::NaiveTime;
use colored::*;
use tracing::debug;

/// Trends command runner
pub fn run_trends(args: TrendsArgs) -> Result<()> {
    debug!("Trends arguments: {:?}", args);
    args.validate()?;

    let config = args.common.resolve_config()?;
    let store = open_store(&config)?;

    let by_location = trend_query::filter_by_location(&store.snapshot(), &args.location);
    let since = args.since.map(|day| day.and_time(NaiveTime::MIN));
    let until = args.until.and_then(|day| {
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).map(|end| day.and_time(end))
    });
    let window = trend_query::filter_by_window(&by_location, since, until);

    if args.daily {
        let daily = trend_query::group_by_day(&window);
        return match args.common.output_format {
            OutputFormat::Json => print_json(&daily),
            OutputFormat::Csv => print_csv(&daily),
            OutputFormat::Human => {
                print_header(&args.location);
                if daily.is_empty() {
                    print_no_data("no dated readings in the selected window");
                }
                for day in &daily {
                    println!(
                        "  {}  {:>14}  ({} readings)",
                        day.day,
                        format_flow(day.mean_rate_of_flow),
                        day.samples
                    );
                }
                Ok(())
            }
        };
    }

    let series = trend_query::flow_series(&window);
    match args.common.output_format {
        OutputFormat::Json => print_json(&series),
        OutputFormat::Csv => print_csv(&series),
        OutputFormat::Human => {
            print_header(&args.location);
            if series.is_empty() {
                print_no_data("no dated readings in the selected window");
            }
            for point in &series {
                println!(
                    "  {}  {:>14}",
                    point.at.format("%Y-%m-%d %H:%M:%S"),
                    format_flow(point.rate_of_flow)
                );
            }
            Ok(())
        }
    }
}

fn print_header(location: &str) {
    println!(
        "{}",
        format!("Historical Rate of Flow Trends for {}", location)
            .bright_green()
            .bold()
    );
}
