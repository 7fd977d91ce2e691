//! Command implementations for the damflow CLI
//!
//! This module contains the command dispatch logic. Each command is implemented
//! in its own module:
//! - `dashboard`: month summary or hourly day breakdown for one dam
//! - `record`: manual entry of a new reading
//! - `trends`: full rate-of-flow history
//! - `locations`: known dams and their profiles
//! - `validate`: load report for the reading log

pub mod dashboard;
pub mod locations;
pub mod record;
pub mod shared;
pub mod trends;
pub mod validate;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner for damflow
///
/// Sets up logging from the subcommand's shared options and dispatches to the
/// matching handler.
pub fn run(args: Args) -> Result<()> {
    let command = args
        .command
        .ok_or_else(|| Error::configuration("No command specified"))?;

    shared::setup_logging(command.common())?;

    match command {
        Commands::Dashboard(dashboard_args) => dashboard::run_dashboard(dashboard_args),
        Commands::Record(record_args) => record::run_record(record_args),
        Commands::Trends(trends_args) => trends::run_trends(trends_args),
        Commands::Locations(locations_args) => locations::run_locations(locations_args),
        Commands::Validate(validate_args) => validate::run_validate(validate_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_without_command_is_configuration_error() {
        let result = run(Args { command: None });
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
