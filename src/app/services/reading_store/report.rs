//! Load report for the reading log
//!
//! Rows that fail validation or clash with a known dam profile are not loaded;
//! they are collected here so the caller can surface them.

use crate::Error;
use std::time::Duration;

/// A rejected row of the reading log
#[derive(Debug)]
pub struct RowIssue {
    /// 1-based line number in the log file (the header is line 1)
    pub line: u64,

    /// Why the row was rejected
    pub error: Error,
}

/// Statistics and rejected rows from loading the reading log
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Data rows read from the file
    pub rows_read: usize,

    /// Readings accepted into the snapshot
    pub readings_loaded: usize,

    /// Accepted readings whose timestamp could not be parsed
    pub undated: usize,

    /// Accepted readings identical to an earlier row
    pub duplicates: usize,

    /// Rows rejected during loading
    pub issues: Vec<RowIssue>,

    /// Time taken to load the log
    pub load_duration: Duration,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any rows were rejected
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.issues.len()
    }

    /// Rows rejected for bad values
    pub fn validation_errors(&self) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(|issue| issue.error.is_validation())
    }

    /// Rows rejected for clashing with a known dam profile
    pub fn consistency_errors(&self) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(|issue| issue.error.is_consistency())
    }

    pub(crate) fn reject(&mut self, line: u64, error: Error) {
        self.issues.push(RowIssue { line, error });
    }

    /// Get a summary string of the load
    pub fn summary(&self) -> String {
        format!(
            "Read {} rows, loaded {} readings ({} undated, {} duplicates), rejected {} in {:.2}s",
            self.rows_read,
            self.readings_loaded,
            self.undated,
            self.duplicates,
            self.rejected(),
            self.load_duration.as_secs_f64()
        )
    }
}
