//! Command-line argument definitions for damflow
//!
//! This module defines the CLI interface using the clap derive API. Each
//! subcommand corresponds to one view of the dam dashboard.

use crate::app::models::Month;
use crate::config::DamFlowConfig;
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the dam water-flow dashboard
#[derive(Debug, Clone, Parser)]
#[command(
    name = "damflow",
    version,
    about = "Record dam water levels and query rate-of-flow trends",
    long_about = "Keeps a CSV log of dam water-level readings and answers rate-of-flow trend \
                  queries over it: daily and hourly averages, month summaries with the latest \
                  change, exact-day lookups and full history series. New readings are validated \
                  against each dam's known profile before they are written."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Rate-of-flow summary for one dam by month or by day
    Dashboard(DashboardArgs),
    /// Record a new water-level reading
    Record(RecordArgs),
    /// Full rate-of-flow history for one dam
    Trends(TrendsArgs),
    /// List known dams and their profiles
    Locations(LocationsArgs),
    /// Load the reading log and report rejected rows
    Validate(ValidateArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct CommonArgs {
    /// Path to the CSV reading log
    ///
    /// Overrides `data_path` from the configuration file.
    #[arg(long = "data", value_name = "PATH", help = "Path to the CSV reading log")]
    pub data_path: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/damflow/config.toml and falls back to defaults.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress logging except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the dashboard command
#[derive(Debug, Clone, Parser)]
pub struct DashboardArgs {
    /// Dam location to summarise
    #[arg(short = 'l', long = "location", value_name = "NAME")]
    pub location: String,

    /// Month to summarise (YYYY-MM); defaults to the latest month with data
    #[arg(long = "month", value_name = "YYYY-MM", conflicts_with = "day")]
    pub month: Option<Month>,

    /// Day to break down by hour (YYYY-MM-DD)
    #[arg(long = "day", value_name = "YYYY-MM-DD")]
    pub day: Option<NaiveDate>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the record command
#[derive(Debug, Clone, Parser)]
pub struct RecordArgs {
    /// Dam location; must already be known unless profile attributes are given
    #[arg(short = 'l', long = "location", value_name = "NAME")]
    pub location: String,

    /// Initial water level in metres
    #[arg(long = "initial", value_name = "METRES")]
    pub initial_level: f64,

    /// Final water level in metres
    #[arg(long = "final", value_name = "METRES")]
    pub final_level: f64,

    /// Date of the reading (YYYY-MM-DD); defaults to today
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Measured rate of flow in m³/s; skips estimation from levels
    #[arg(long = "rate-of-flow", value_name = "M3_PER_S")]
    pub rate_of_flow: Option<f64>,

    /// Override the configured flow estimator factor
    #[arg(long = "factor", value_name = "FACTOR")]
    pub factor: Option<f64>,

    /// Dam shape, for a location not yet in the log
    #[arg(long = "shape", value_name = "SHAPE")]
    pub shape: Option<String>,

    /// Latitude in decimal degrees, for a location not yet in the log
    #[arg(long = "lat", value_name = "DEGREES", requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees, for a location not yet in the log
    #[arg(long = "lon", value_name = "DEGREES", requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Cross-sectional area in square metres, for a location not yet in the log
    #[arg(long = "area", value_name = "M2")]
    pub area: Option<f64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the trends command
#[derive(Debug, Clone, Parser)]
pub struct TrendsArgs {
    /// Dam location
    #[arg(short = 'l', long = "location", value_name = "NAME")]
    pub location: String,

    /// First day to include (YYYY-MM-DD)
    #[arg(long = "since", value_name = "YYYY-MM-DD")]
    pub since: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long = "until", value_name = "YYYY-MM-DD")]
    pub until: Option<NaiveDate>,

    /// Show daily averages instead of individual readings
    #[arg(long = "daily")]
    pub daily: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the locations command
#[derive(Debug, Clone, Parser)]
pub struct LocationsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Exit with an error when any row was rejected
    #[arg(long = "strict")]
    pub strict: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Commands {
    /// Shared options of whichever subcommand was chosen
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Dashboard(args) => &args.common,
            Commands::Record(args) => &args.common,
            Commands::Trends(args) => &args.common,
            Commands::Locations(args) => &args.common,
            Commands::Validate(args) => &args.common,
        }
    }
}

impl CommonArgs {
    /// Get log level from verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Resolve configuration from the config file and command-line overrides
    pub fn resolve_config(&self) -> Result<DamFlowConfig> {
        let mut config = DamFlowConfig::load(self.config_file.as_deref())?;
        if let Some(path) = &self.data_path {
            config = config.with_data_path(path.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

impl TrendsArgs {
    /// Validate the date window
    pub fn validate(&self) -> Result<()> {
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(Error::configuration(format!(
                    "--since {} is after --until {}",
                    since, until
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_dashboard_month_parsing() {
        let args = parse(&["damflow", "dashboard", "-l", "Koyna", "--month", "2024-01"]);
        match args.command {
            Some(Commands::Dashboard(dashboard)) => {
                assert_eq!(dashboard.location, "Koyna");
                assert_eq!(dashboard.month, Some(Month { year: 2024, month: 1 }));
                assert_eq!(dashboard.day, None);
                assert_eq!(dashboard.common.output_format, OutputFormat::Human);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_dashboard_month_and_day_conflict() {
        let result = Args::try_parse_from([
            "damflow",
            "dashboard",
            "-l",
            "Koyna",
            "--month",
            "2024-01",
            "--day",
            "2024-01-05",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_month_rejected() {
        let result = Args::try_parse_from(["damflow", "dashboard", "-l", "A", "--month", "2024-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_parsing() {
        let args = parse(&[
            "damflow", "record", "-l", "B", "--initial", "300", "--final", "800", "--date",
            "2024-02-01", "--lat", "-10.5", "--lon", "20", "--format", "json",
        ]);
        match args.command {
            Some(Commands::Record(record)) => {
                assert_eq!(record.initial_level, 300.0);
                assert_eq!(record.final_level, 800.0);
                assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 2, 1));
                assert_eq!(record.lat, Some(-10.5));
                assert_eq!(record.common.output_format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level_from_verbosity() {
        let args = parse(&["damflow", "locations", "-vv"]);
        let common = args.command.as_ref().unwrap().common();
        assert_eq!(common.get_log_level(), "debug");

        let args = parse(&["damflow", "validate", "-q"]);
        assert_eq!(args.command.as_ref().unwrap().common().get_log_level(), "error");
    }

    #[test]
    fn test_trends_window_validation() {
        let args = parse(&[
            "damflow", "trends", "-l", "A", "--since", "2024-02-01", "--until", "2024-01-01",
        ]);
        match args.command {
            Some(Commands::Trends(trends)) => assert!(trends.validate().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_config_data_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "flow_factor = 1.1\n").unwrap();
        let config_arg = config_path.to_string_lossy().to_string();

        let args = parse(&[
            "damflow", "locations", "--config", &config_arg, "--data", "/tmp/other.csv",
        ]);
        let config = args.command.unwrap().common().resolve_config().unwrap();
        assert_eq!(config.flow_factor, 1.1);
        assert_eq!(config.data_path, PathBuf::from("/tmp/other.csv"));
    }
}
