//! Sampling frequency strings.

use std::fmt;
use std::str::FromStr;

use crate::DatasetError;

/// Base unit of a [`Frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    /// `N`, `ns`
    Nanosecond,
    /// `U`, `us`
    Microsecond,
    /// `L`, `ms`
    Millisecond,
    /// `S`, `s`
    Second,
    /// `T`, `min`
    Minute,
    /// `H`, `h`
    Hour,
    /// `BH`
    BusinessHour,
    /// `D`
    Day,
    /// `B`
    BusinessDay,
    /// `W`, optionally anchored (`W-SUN`)
    Week,
    /// `SM`, `SMS`
    SemiMonth,
    /// `M`, `MS`, `ME`
    Month,
    /// `Q`, `QS`, `QE`, optionally anchored
    Quarter,
    /// `A`, `AS`, `Y`, `YS`, `YE`, optionally anchored
    Year,
}

impl FrequencyUnit {
    fn parse(code: &str) -> Option<Self> {
        Some(match code {
            "N" | "ns" => Self::Nanosecond,
            "U" | "us" => Self::Microsecond,
            "L" | "ms" => Self::Millisecond,
            "S" | "s" => Self::Second,
            "T" | "min" => Self::Minute,
            "H" | "h" => Self::Hour,
            "BH" => Self::BusinessHour,
            "D" => Self::Day,
            "B" => Self::BusinessDay,
            "W" => Self::Week,
            "SM" | "SMS" => Self::SemiMonth,
            "M" | "MS" | "ME" => Self::Month,
            "Q" | "QS" | "QE" => Self::Quarter,
            "A" | "AS" | "Y" | "YS" | "YE" => Self::Year,
            _ => return None,
        })
    }
}

/// A pandas-style frequency such as `"H"`, `"5min"`, or `"W-SUN"`.
///
/// The original string is kept so that metadata round-trips unchanged.
///
/// # Examples
///
/// ```
/// use tsdata_core::dataset::Frequency;
/// use tsdata_core::dataset::FrequencyUnit;
///
/// let freq: Frequency = "30min".parse()?;
/// assert_eq!(freq.multiple(), 30);
/// assert_eq!(freq.unit(), FrequencyUnit::Minute);
/// assert_eq!(freq.to_string(), "30min");
/// # Ok::<(), tsdata_core::DatasetError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frequency {
    raw: String,
    multiple: u32,
    unit: FrequencyUnit,
    anchor: Option<String>,
}

impl Frequency {
    /// Multiplier in front of the unit; `1` when omitted.
    #[must_use]
    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    /// Base unit.
    #[must_use]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Anchor suffix such as `SUN` in `W-SUN`.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// The string this frequency was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Frequency {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DatasetError::InvalidFrequency(s.to_string());
        let trimmed = s.trim();

        let digits = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (number, rest) = trimmed.split_at(digits);
        let multiple = if number.is_empty() {
            1
        } else {
            number.parse::<u32>().map_err(|_| invalid())?
        };
        if multiple == 0 {
            return Err(invalid());
        }

        let (code, anchor) = match rest.split_once('-') {
            Some((code, anchor)) if !anchor.is_empty() => (code, Some(anchor.to_string())),
            Some(_) => return Err(invalid()),
            None => (rest, None),
        };
        let unit = FrequencyUnit::parse(code).ok_or_else(invalid)?;

        Ok(Self {
            raw: trimmed.to_string(),
            multiple,
            unit,
            anchor,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
