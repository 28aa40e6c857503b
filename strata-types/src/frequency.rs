//! Fixed-duration resampling frequencies such as `17min` or `30s`.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// Unit of a [`Frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrequencyUnit {
    /// Nanoseconds (`ns`).
    Nanos,
    /// Microseconds (`us`, `µs`).
    Micros,
    /// Milliseconds (`ms`, `L`).
    Millis,
    /// Seconds (`s`, `S`, `sec`).
    Seconds,
    /// Minutes (`min`, `T`).
    Minutes,
    /// Hours (`h`, `H`).
    Hours,
    /// Days (`D`, `d`).
    Days,
}

impl FrequencyUnit {
    const fn nanos(self) -> i64 {
        match self {
            Self::Nanos => 1,
            Self::Micros => 1_000,
            Self::Millis => 1_000_000,
            Self::Seconds => 1_000_000_000,
            Self::Minutes => 60_000_000_000,
            Self::Hours => 3_600_000_000_000,
            Self::Days => 86_400_000_000_000,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Nanos => "ns",
            Self::Micros => "us",
            Self::Millis => "ms",
            Self::Seconds => "s",
            Self::Minutes => "min",
            Self::Hours => "h",
            Self::Days => "D",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        let unit = match s {
            "ns" | "N" => Self::Nanos,
            "us" | "µs" | "U" => Self::Micros,
            "ms" | "L" => Self::Millis,
            "s" | "S" | "sec" => Self::Seconds,
            "min" | "T" => Self::Minutes,
            "h" | "H" => Self::Hours,
            "D" | "d" => Self::Days,
            _ => return None,
        };
        Some(unit)
    }
}

/// A fixed step between consecutive rows of a resampled table.
///
/// Parsed from `<count><unit>` where `count` is an optional positive integer
/// (default 1). Calendar-anchored frequencies (weeks, months) are not fixed
/// durations and are rejected.
///
/// ```
/// use strata_types::Frequency;
///
/// let f: Frequency = "17min".parse().unwrap();
/// assert_eq!(f.as_delta().num_seconds(), 17 * 60);
/// assert_eq!(f.to_string(), "17min");
/// assert_eq!("30S".parse::<Frequency>().unwrap().to_string(), "30s");
/// assert!("0min".parse::<Frequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    count: i64,
    unit: FrequencyUnit,
}

impl Frequency {
    /// Build a frequency from a count and a unit.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `count` is not positive or the total
    /// duration does not fit in 64-bit nanoseconds.
    pub fn new(count: i64, unit: FrequencyUnit) -> Result<Self, StrataError> {
        if count <= 0 {
            return Err(StrataError::InvalidFrequency(format!(
                "{count}{}: count must be positive",
                unit.suffix()
            )));
        }
        if count.checked_mul(unit.nanos()).is_none() {
            return Err(StrataError::InvalidFrequency(format!(
                "{count}{}: duration too large",
                unit.suffix()
            )));
        }
        Ok(Self { count, unit })
    }

    /// Multiplier in front of the unit.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// Unit of the step.
    #[must_use]
    pub const fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// The step as a duration.
    #[must_use]
    pub fn as_delta(&self) -> TimeDelta {
        // Overflow was ruled out in `new`.
        TimeDelta::nanoseconds(self.count * self.unit.nanos())
    }
}

impl FromStr for Frequency {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);
        let unit = FrequencyUnit::from_suffix(suffix.trim())
            .ok_or_else(|| StrataError::InvalidFrequency(format!("unknown unit in {s:?}")))?;
        let count = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<i64>()
                .map_err(|e| StrataError::InvalidFrequency(format!("{s:?}: {e}")))?
        };
        Self::new(count, unit)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl TryFrom<String> for Frequency {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}
