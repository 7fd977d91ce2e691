//! Reading log writer
//!
//! Writes the full reading log to a temporary file next to the target and
//! renames it into place, so a failed write never leaves a truncated log.
//! Rows rejected at load are written back verbatim at their original position
//! among the readings.

use super::loader::RejectedRow;
use crate::app::models::Reading;
use crate::constants::columns;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Render a reading as a log row in canonical column order
pub fn to_record(reading: &Reading) -> [String; 9] {
    let profile = &reading.profile;
    [
        reading.recorded_at.to_string(),
        reading.initial_level.to_string(),
        reading.final_level.to_string(),
        profile.dam_shape.clone().unwrap_or_default(),
        profile.location.clone(),
        optional_number(profile.lat),
        optional_number(profile.lon),
        optional_number(profile.cross_sectional_area),
        reading.rate_of_flow.to_string(),
    ]
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Atomically replace the log at `path` with `readings` and `rejected` rows
///
/// `rejected` must be ordered by position.
pub fn write_log(path: &Path, readings: &[Reading], rejected: &[RejectedRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::io(
            format!("Failed to create temporary log file in {}", dir.display()),
            e,
        )
    })?;

    {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        writer
            .write_record(columns::HEADER)
            .map_err(|e| write_error(path, e))?;

        let mut pending = rejected.iter().peekable();
        for (position, reading) in readings.iter().enumerate() {
            while let Some(row) = pending.next_if(|row| row.position <= position) {
                writer
                    .write_byte_record(&row.record)
                    .map_err(|e| write_error(path, e))?;
            }
            writer
                .write_record(to_record(reading))
                .map_err(|e| write_error(path, e))?;
        }
        for row in pending {
            writer
                .write_byte_record(&row.record)
                .map_err(|e| write_error(path, e))?;
        }

        writer.flush().map_err(|e| {
            Error::io(format!("Failed to flush reading log {}", path.display()), e)
        })?;
    }

    temp.as_file_mut()
        .flush()
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| Error::io(format!("Failed to sync reading log {}", path.display()), e))?;

    temp.persist(path).map_err(|e| {
        Error::io(
            format!("Failed to replace reading log {}", path.display()),
            e.error,
        )
    })?;

    debug!(
        "Wrote {} readings and {} rejected rows to {}",
        readings.len(),
        rejected.len(),
        path.display()
    );
    Ok(())
}

fn write_error(path: &Path, error: csv::Error) -> Error {
    let file = path.display().to_string();
    let message = format!("Failed to write reading log {}", file);
    if !error.is_io_error() {
        return Error::csv_parsing(file, message, Some(error));
    }
    match error.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(message, source),
        _ => Error::csv_parsing(file, message, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_keeps_csv_errors_as_csv() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["a", "b"]).unwrap();
        let error = writer.write_record(["c"]).unwrap_err();

        let mapped = write_error(Path::new("log.csv"), error);
        assert!(matches!(
            mapped,
            Error::CsvParsing {
                source: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_write_error_maps_io_to_io() {
        let error = csv::Error::from(std::io::Error::other("disk full"));
        assert!(write_error(Path::new("log.csv"), error).is_io());
    }
}
