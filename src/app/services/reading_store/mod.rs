//! Reading store service owning the dam reading log
//!
//! The store loads the CSV log once at start-up, keeps the readings as an
//! immutable, versioned [`Snapshot`], and appends new readings by persisting the
//! whole log before publishing the next snapshot version.

use crate::app::models::{DamProfile, Reading};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod loader;
pub mod registry;
pub mod report;
pub mod writer;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use loader::RejectedRow;
pub use registry::ProfileRegistry;
pub use report::{LoadReport, RowIssue};

/// Immutable point-in-time view of all readings
///
/// Readings are kept in insertion (log) order. Cloning is cheap; holders of an
/// older snapshot are unaffected by later appends.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    version: u64,
    readings: Arc<Vec<Reading>>,
}

impl Snapshot {
    pub fn new(version: u64, readings: Vec<Reading>) -> Self {
        Self {
            version,
            readings: Arc::new(readings),
        }
    }

    /// Version of the store this snapshot was taken from
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Readings in insertion order
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Distinct locations present in the snapshot
    pub fn locations(&self) -> BTreeSet<String> {
        self.readings
            .iter()
            .map(|reading| reading.location().to_string())
            .collect()
    }

    /// Snapshot of the same version holding a subset of readings
    pub(crate) fn derive(&self, readings: Vec<Reading>) -> Self {
        Self::new(self.version, readings)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Owner of the canonical reading collection and its backing log file
///
/// Writes must be serialised by the caller; `append` takes `&mut self`.
#[derive(Debug)]
pub struct ReadingStore {
    /// Path to the CSV reading log
    path: PathBuf,

    /// Current published snapshot
    snapshot: Snapshot,

    /// Static profile of every known dam
    profiles: ProfileRegistry,

    /// Report from the most recent load
    report: LoadReport,

    /// Rows rejected at load, carried through rewrites of the log
    rejected_rows: Vec<RejectedRow>,
}

impl ReadingStore {
    /// Open an existing reading log
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let loaded = loader::load_log(&path, 1)?;

        Ok(Self {
            path,
            snapshot: loaded.snapshot,
            profiles: loaded.profiles,
            report: loaded.report,
            rejected_rows: loaded.rejected_rows,
        })
    }

    /// Open a reading log, creating an empty one (header only) if it is missing
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::io(
                        format!("Failed to create data directory {}", parent.display()),
                        e,
                    )
                })?;
            }
            info!("Creating empty reading log at {}", path.display());
            writer::write_log(&path, &[], &[])?;
        }

        Self::open(path)
    }

    /// Reload the log from disk and publish it as a new snapshot version
    pub fn load(&mut self) -> Result<Snapshot> {
        let loaded = loader::load_log(&self.path, self.snapshot.version() + 1)?;

        self.snapshot = loaded.snapshot;
        self.profiles = loaded.profiles;
        self.report = loaded.report;
        self.rejected_rows = loaded.rejected_rows;

        Ok(self.snapshot.clone())
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    /// Distinct locations in the current snapshot
    pub fn locations(&self) -> BTreeSet<String> {
        self.snapshot.locations()
    }

    /// Report produced by the most recent load
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    /// Static profile for a location, if the dam is known
    pub fn profile(&self, location: &str) -> Option<&DamProfile> {
        self.profiles.get(location)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows from the last load that were rejected but are kept in the file
    pub fn rejected_rows(&self) -> &[RejectedRow] {
        &self.rejected_rows
    }

    /// Validate, persist and publish a new reading
    ///
    /// Location and shape are trimmed first, matching how the log is read
    /// back. Fails without touching the store on validation or consistency
    /// errors. On persistence failure the current snapshot stays published and
    /// the I/O error is returned.
    pub fn append(&mut self, reading: Reading) -> Result<()> {
        let reading = reading.normalized();
        reading.validate()?;

        if !reading.is_dated() {
            return Err(Error::validation(format!(
                "Reading for '{}' has no valid date ('{}')",
                reading.location(),
                reading.recorded_at
            )));
        }

        self.profiles.check(&reading.profile)?;

        if self.snapshot.iter().any(|existing| existing == &reading) {
            return Err(Error::validation(format!(
                "Duplicate reading for '{}' at {}",
                reading.location(),
                reading.recorded_at
            )));
        }

        let mut readings = Vec::with_capacity(self.snapshot.len() + 1);
        readings.extend_from_slice(self.snapshot.readings());
        readings.push(reading.clone());

        if let Err(e) = writer::write_log(&self.path, &readings, &self.rejected_rows) {
            warn!(
                "Append for '{}' not persisted, keeping snapshot v{}: {}",
                reading.location(),
                self.snapshot.version(),
                e
            );
            return Err(e);
        }

        if self.profiles.register(reading.profile.clone())? {
            debug!("Registered new dam profile for '{}'", reading.location());
        }

        self.snapshot = Snapshot::new(self.snapshot.version() + 1, readings);

        info!(
            "Appended reading for '{}' at {} (snapshot v{}, {} readings)",
            reading.location(),
            reading.recorded_at,
            self.snapshot.version(),
            self.snapshot.len()
        );

        Ok(())
    }
}
