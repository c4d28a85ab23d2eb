//! Series start timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Timelike;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::DatasetError;

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const OUTPUT_FORMAT_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Timestamp of the first observation in a series.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM`, and date-times separated by a space or
/// `T`, with optional seconds and fractional seconds. Serializes as
/// `YYYY-MM-DD HH:MM:SS`, followed by the fraction when it is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wraps a date-time.
    #[must_use]
    pub const fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Returns the underlying date-time.
    #[must_use]
    pub const fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d"))
            .map_err(|_| DatasetError::InvalidTimestamp(s.to_string()))?;
        date.and_hms_opt(0, 0, 0)
            .map(Self)
            .ok_or_else(|| DatasetError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if self.0.nanosecond() == 0 {
            OUTPUT_FORMAT
        } else {
            OUTPUT_FORMAT_FRACTION
        };
        write!(f, "{}", self.0.format(format))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
