//! Reading log loader
//!
//! Parses the CSV log into readings, building the dam profile registry as it
//! goes. Row-level problems are recorded in the [`LoadReport`] and never abort
//! the load; only an unreadable file or a missing column does.

use super::registry::ProfileRegistry;
use super::report::LoadReport;
use super::writer::to_record;
use super::Snapshot;
use crate::app::models::{DamProfile, Reading, RecordedAt};
use crate::constants::columns;
use crate::{Error, Result};
use csv::{ByteRecord, StringRecord};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything produced by loading the log
#[derive(Debug)]
pub struct LoadedLog {
    pub snapshot: Snapshot,
    pub profiles: ProfileRegistry,
    pub report: LoadReport,
    pub rejected_rows: Vec<RejectedRow>,
}

/// Raw row that failed to load, kept so rewrites of the log preserve it
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Number of accepted readings that precede the row in the log
    pub position: usize,

    /// 1-based line number in the file it was read from
    pub line: u64,

    /// Field bytes in canonical column order
    pub record: ByteRecord,
}

/// Header name to column index mapping
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub name_to_index: HashMap<String, usize>,
}

impl ColumnMapping {
    /// Map header names and make sure every log column is present
    pub fn from_headers(headers: &StringRecord, file: &str) -> Result<Self> {
        let name_to_index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.trim().to_string(), index))
            .collect();

        let missing: Vec<&str> = columns::HEADER
            .iter()
            .copied()
            .filter(|name| !name_to_index.contains_key(*name))
            .collect();

        if !missing.is_empty() {
            return Err(Error::csv_parsing(
                file,
                format!("Missing required columns: {}", missing.join(", ")),
                None,
            ));
        }

        Ok(Self { name_to_index })
    }

    /// Reorder a raw row into canonical column order
    ///
    /// Columns outside the log layout are dropped; short rows are padded with
    /// empty fields.
    pub fn canonical(&self, record: &ByteRecord) -> ByteRecord {
        columns::HEADER
            .iter()
            .map(|name| {
                self.name_to_index
                    .get(*name)
                    .and_then(|&index| record.get(index))
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Load the reading log at `path`, publishing it as snapshot `version`
pub fn load_log(path: &Path, version: u64) -> Result<LoadedLog> {
    let start = Instant::now();
    let file_name = path.display().to_string();

    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open reading log {}", file_name), e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| {
        Error::csv_parsing(&file_name, "Failed to read header row", Some(e))
    })?;
    let mapping = ColumnMapping::from_headers(headers, &file_name)?;

    let mut report = LoadReport::new();
    let mut profiles = ProfileRegistry::new();
    let mut readings = Vec::new();
    let mut seen_rows: HashSet<[String; 9]> = HashSet::new();
    let mut rejected_rows = Vec::new();

    for (index, result) in reader.byte_records().enumerate() {
        report.rows_read += 1;
        let fallback_line = index as u64 + 2;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => {
                return Err(Error::csv_parsing(
                    &file_name,
                    "Failed to read reading log",
                    Some(e),
                ));
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                warn!("Skipping unreadable row at line {}: {}", line, e);
                report.reject(line, Error::validation(format!("Malformed row: {}", e)));
                continue;
            }
        };
        let line = raw
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);
        let mut reject = |error: Error, report: &mut LoadReport| {
            rejected_rows.push(RejectedRow {
                position: readings.len(),
                line,
                record: mapping.canonical(&raw),
            });
            report.reject(line, error);
        };

        let record = match StringRecord::from_byte_record(raw.clone()) {
            Ok(record) => record,
            Err(e) => {
                warn!("Rejected row at line {}: {}", line, e);
                reject(
                    Error::validation(format!("Row is not valid UTF-8: {}", e)),
                    &mut report,
                );
                continue;
            }
        };

        let reading = match parse_reading(&record, &mapping) {
            Ok(reading) => reading,
            Err(e) => {
                debug!("Rejected row at line {}: {}", line, e);
                reject(e, &mut report);
                continue;
            }
        };

        if let Err(e) = profiles.register(reading.profile.clone()) {
            warn!("Rejected row at line {}: {}", line, e);
            reject(e, &mut report);
            continue;
        }

        if !reading.is_dated() {
            debug!(
                "Undated reading at line {}: '{}'",
                line, reading.recorded_at
            );
            report.undated += 1;
        }

        if !seen_rows.insert(to_record(&reading)) {
            report.duplicates += 1;
        }

        readings.push(reading);
    }

    report.readings_loaded = readings.len();
    report.load_duration = start.elapsed();

    if report.has_issues() {
        warn!(
            "Reading log {} has {} rejected rows",
            file_name,
            report.rejected()
        );
    }
    info!("{}", report.summary());

    Ok(LoadedLog {
        snapshot: Snapshot::new(version, readings),
        profiles,
        report,
        rejected_rows,
    })
}

/// Parse and validate one row
pub fn parse_reading(record: &StringRecord, mapping: &ColumnMapping) -> Result<Reading> {
    let recorded_at =
        RecordedAt::parse(get_optional_field(record, mapping, columns::DATE_RECORDED).unwrap_or(""));

    let profile = DamProfile {
        location: get_required_field(record, mapping, columns::DAM_LOCATION)?.to_string(),
        dam_shape: get_optional_field(record, mapping, columns::DAM_SHAPE).map(str::to_string),
        lat: parse_optional_f64(record, mapping, columns::DAM_LAT_COORDS)?,
        lon: parse_optional_f64(record, mapping, columns::DAM_LONG_COORDS)?,
        cross_sectional_area: parse_optional_f64(record, mapping, columns::CROSS_SECTIONAL_AREA)?,
    };

    let reading = Reading {
        recorded_at,
        initial_level: parse_required_f64(record, mapping, columns::INITIAL_WATER_LEVEL)?,
        final_level: parse_required_f64(record, mapping, columns::FINAL_WATER_LEVEL)?,
        rate_of_flow: parse_required_f64(record, mapping, columns::RATE_OF_FLOW)?,
        profile,
    };

    reading.validate()?;
    Ok(reading)
}

/// Parse a required decimal field
pub fn parse_required_f64(
    record: &StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Result<f64> {
    let value_str = get_required_field(record, mapping, field_name)?;
    parse_f64(value_str, field_name)
}

/// Parse an optional decimal field; empty means absent, malformed is an error
pub fn parse_optional_f64(
    record: &StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Result<Option<f64>> {
    get_optional_field(record, mapping, field_name)
        .map(|value_str| parse_f64(value_str, field_name))
        .transpose()
}

fn parse_f64(value_str: &str, field_name: &str) -> Result<f64> {
    value_str.parse::<f64>().map_err(|e| {
        Error::validation(format!(
            "Invalid number for {}: '{}' ({})",
            field_name, value_str, e
        ))
    })
}

/// Get a required field value from a CSV record
pub fn get_required_field<'a>(
    record: &'a StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Result<&'a str> {
    get_optional_field(record, mapping, field_name).ok_or_else(|| {
        Error::validation(format!("Empty value for required column '{}'", field_name))
    })
}

/// Get an optional field value from a CSV record
pub fn get_optional_field<'a>(
    record: &'a StringRecord,
    mapping: &ColumnMapping,
    field_name: &str,
) -> Option<&'a str> {
    mapping
        .name_to_index
        .get(field_name)
        .and_then(|&index| record.get(index))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}
