//! Data models for damflow
//!
//! This module contains the core data structures for representing dam readings,
//! the static profile of each dam, and the timestamp and month keys used by the
//! trend queries.

use crate::constants::{
    DATE_FORMAT, DATETIME_FORMATS, DATETIME_WRITE_FORMAT, MAX_LATITUDE, MAX_LONGITUDE,
    MIN_LATITUDE, MIN_LONGITUDE,
};
use crate::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Recording Timestamp
// =============================================================================

/// Point in time a reading was recorded
///
/// The log stores either a bare date or a full date-time. Text that does not
/// parse as either is kept verbatim as [`RecordedAt::Undated`] so the row can be
/// written back unchanged; undated readings never take part in time-based queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAt {
    /// Calendar date without a time of day (treated as midnight)
    Date(NaiveDate),
    /// Full date-time
    DateTime(NaiveDateTime),
    /// Unparseable timestamp text as found in the log
    Undated(String),
}

impl RecordedAt {
    /// Parse a timestamp field, falling back to `Undated` instead of failing
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Self::Date(date);
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::DateTime(dt);
            }
        }

        // Offsets are normalised to UTC wall time
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::DateTime(dt.naive_utc());
        }

        Self::Undated(text.to_string())
    }

    /// Timestamp used for ordering; `None` for undated readings
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(date) => Some(date.and_time(NaiveTime::MIN)),
            Self::DateTime(dt) => Some(*dt),
            Self::Undated(_) => None,
        }
    }

    /// Calendar day of the reading
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    pub fn is_dated(&self) -> bool {
        !matches!(self, Self::Undated(_))
    }
}

impl fmt::Display for RecordedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_WRITE_FORMAT)),
            Self::Undated(raw) => f.write_str(raw),
        }
    }
}

impl From<NaiveDate> for RecordedAt {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for RecordedAt {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl Serialize for RecordedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Month Key
// =============================================================================

/// Calendar month used to group readings (`YYYY-MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Create a month, rejecting month numbers outside 1-12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!(
                "Invalid month {}: must be between 1 and 12",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s.trim().split_once('-').ok_or_else(|| {
            Error::validation(format!("Invalid month '{}': expected YYYY-MM", s))
        })?;

        let year = year
            .parse::<i32>()
            .map_err(|e| Error::validation(format!("Invalid year in month '{}': {}", s, e)))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| Error::validation(format!("Invalid month in '{}': {}", s, e)))?;

        Self::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Dam Profile
// =============================================================================

/// Static, location-invariant attributes of a dam
///
/// Every reading carries a copy of its dam's profile. All readings for one
/// location must agree on it; see [`DamProfile::mismatches`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamProfile {
    /// Dam site identifier
    pub location: String,

    /// Shape of the dam cross-section (e.g. "trapezoidal")
    pub dam_shape: Option<String>,

    /// Latitude in decimal degrees
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    pub lon: Option<f64>,

    /// Cross-sectional area in square metres
    pub cross_sectional_area: Option<f64>,
}

impl DamProfile {
    /// Profile with a location and no static attributes
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            dam_shape: None,
            lat: None,
            lon: None,
            cross_sectional_area: None,
        }
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.dam_shape = Some(shape.into());
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    pub fn with_cross_sectional_area(mut self, area: f64) -> Self {
        self.cross_sectional_area = Some(area);
        self
    }

    /// Trim location and shape the way the log loader reads them back
    ///
    /// A shape that is blank after trimming becomes absent.
    pub fn normalized(mut self) -> Self {
        self.location = self.location.trim().to_string();
        self.dam_shape = self
            .dam_shape
            .map(|shape| shape.trim().to_string())
            .filter(|shape| !shape.is_empty());
        self
    }

    /// Validate location and attribute ranges
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::validation("Dam location cannot be empty"));
        }

        if let Some(shape) = &self.dam_shape {
            if shape.trim().is_empty() {
                return Err(Error::validation(
                    "Dam shape cannot be blank when provided",
                ));
            }
        }

        if let Some(lat) = self.lat {
            if !lat.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
                return Err(Error::validation(format!(
                    "Invalid latitude {}: must be between -90 and 90 degrees",
                    lat
                )));
            }
        }

        if let Some(lon) = self.lon {
            if !lon.is_finite() || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
                return Err(Error::validation(format!(
                    "Invalid longitude {}: must be between -180 and 180 degrees",
                    lon
                )));
            }
        }

        if let Some(area) = self.cross_sectional_area {
            if !area.is_finite() || area < 0.0 {
                return Err(Error::validation(format!(
                    "Invalid cross-sectional area {}: must be a non-negative number",
                    area
                )));
            }
        }

        Ok(())
    }

    /// Names of the static attributes that differ from `other`
    pub fn mismatches(&self, other: &DamProfile) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.dam_shape != other.dam_shape {
            fields.push("dam_shape");
        }
        if self.lat != other.lat {
            fields.push("lat");
        }
        if self.lon != other.lon {
            fields.push("lon");
        }
        if self.cross_sectional_area != other.cross_sectional_area {
            fields.push("cross_sectional_area");
        }
        fields
    }

    /// Get dam location as (latitude, longitude) if both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

/// One row of the reading log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// When the reading was taken
    pub recorded_at: RecordedAt,

    /// Water level at the start of the measurement, in metres
    pub initial_level: f64,

    /// Water level at the end of the measurement, in metres
    pub final_level: f64,

    /// Rate of flow in cubic metres per second
    pub rate_of_flow: f64,

    /// Static attributes of the dam, copied onto the row
    #[serde(flatten)]
    pub profile: DamProfile,
}

impl Reading {
    /// Create a new reading with validation
    pub fn new(
        recorded_at: impl Into<RecordedAt>,
        profile: DamProfile,
        initial_level: f64,
        final_level: f64,
        rate_of_flow: f64,
    ) -> Result<Self> {
        let reading = Self {
            recorded_at: recorded_at.into(),
            initial_level,
            final_level,
            rate_of_flow,
            profile: profile.normalized(),
        };

        reading.validate()?;
        Ok(reading)
    }

    /// Same reading with a normalised profile
    pub fn normalized(self) -> Self {
        Self {
            profile: self.profile.normalized(),
            ..self
        }
    }

    /// Validate levels, flow and profile
    pub fn validate(&self) -> Result<()> {
        for (name, level) in [
            ("initial", self.initial_level),
            ("final", self.final_level),
        ] {
            if !level.is_finite() || level < 0.0 {
                return Err(Error::validation(format!(
                    "Invalid {} water level {}: must be a non-negative number",
                    name, level
                )));
            }
        }

        if !self.rate_of_flow.is_finite() {
            return Err(Error::validation(format!(
                "Invalid rate of flow {}: must be a finite number",
                self.rate_of_flow
            )));
        }

        self.profile.validate()
    }

    pub fn location(&self) -> &str {
        &self.profile.location
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.recorded_at.timestamp()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.recorded_at.date()
    }

    pub fn is_dated(&self) -> bool {
        self.recorded_at.is_dated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile() -> DamProfile {
        DamProfile::new("Koyna")
            .with_shape("trapezoidal")
            .with_coordinates(17.4, 73.75)
            .with_cross_sectional_area(120.0)
    }

    #[test]
    fn test_recorded_at_parses_date_only() {
        let parsed = RecordedAt::parse("2024-01-31");
        assert_eq!(
            parsed,
            RecordedAt::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert_eq!(parsed.to_string(), "2024-01-31");
    }

    #[test]
    fn test_recorded_at_parses_datetime_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();

        for text in [
            "2024-03-05 14:30:00",
            "2024-03-05T14:30:00",
            "2024-03-05 14:30",
            "2024-03-05T14:30:00Z",
            "2024-03-05T16:30:00+02:00",
        ] {
            assert_eq!(
                RecordedAt::parse(text),
                RecordedAt::DateTime(expected),
                "failed for {}",
                text
            );
        }
    }

    #[test]
    fn test_recorded_at_undated_keeps_raw_text() {
        let parsed = RecordedAt::parse("last tuesday");
        assert!(!parsed.is_dated());
        assert_eq!(parsed.timestamp(), None);
        assert_eq!(parsed.to_string(), "last tuesday");

        assert!(!RecordedAt::parse("2024-02-30").is_dated());
        assert!(!RecordedAt::parse("").is_dated());
    }

    #[test]
    fn test_date_is_midnight_timestamp() {
        let parsed = RecordedAt::parse("2024-01-31");
        let ts = parsed.timestamp().unwrap();
        assert_eq!(ts.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_datetime_write_format_round_trips() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(14, 30, 0, 250)
            .unwrap();
        let text = RecordedAt::DateTime(dt).to_string();
        assert_eq!(RecordedAt::parse(&text), RecordedAt::DateTime(dt));
    }

    #[test]
    fn test_month_parse_and_display() {
        let month: Month = "2024-01".parse().unwrap();
        assert_eq!(month, Month { year: 2024, month: 1 });
        assert_eq!(month.to_string(), "2024-01");

        assert!("2024-13".parse::<Month>().is_err());
        assert!("January".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_ordering() {
        let dec: Month = "2023-12".parse().unwrap();
        let jan: Month = "2024-01".parse().unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn test_reading_rejects_negative_levels() {
        let result = Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            profile(),
            -1.0,
            10.0,
            5.0,
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_reading_rejects_non_finite_flow() {
        let result = Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            profile(),
            1.0,
            10.0,
            f64::NAN,
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_reading_rejects_empty_location() {
        let result = Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            DamProfile::new("  "),
            1.0,
            10.0,
            5.0,
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_profile_validation_ranges() {
        assert!(profile().validate().is_ok());
        assert!(profile().with_coordinates(91.0, 0.0).validate().is_err());
        assert!(profile().with_coordinates(0.0, 181.0).validate().is_err());
        assert!(profile().with_cross_sectional_area(-2.0).validate().is_err());
    }

    #[test]
    fn test_profile_mismatches() {
        let base = profile();
        assert!(base.mismatches(&profile()).is_empty());

        let other = profile().with_shape("rectangular").with_cross_sectional_area(5.0);
        assert_eq!(
            base.mismatches(&other),
            vec!["dam_shape", "cross_sectional_area"]
        );

        let bare = DamProfile::new("Koyna");
        assert_eq!(base.mismatches(&bare).len(), 4);
    }

    #[test]
    fn test_reading_new_trims_profile_text() {
        let padded = DamProfile::new("  Koyna ").with_shape(" trapezoidal\t");
        let reading = Reading::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            padded,
            1.0,
            2.0,
            1.0,
        )
        .unwrap();

        assert_eq!(reading.location(), "Koyna");
        assert_eq!(reading.profile.dam_shape.as_deref(), Some("trapezoidal"));

        let blank_shape = DamProfile::new("Koyna").with_shape("   ").normalized();
        assert_eq!(blank_shape.dam_shape, None);
    }
}
