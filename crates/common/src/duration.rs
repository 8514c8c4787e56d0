//! Durations in the compact header notation (`500ms`, `10s`, `2m`, `1h`).

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl DurationUnit {
    fn suffix(self) -> &'static str {
        match self {
            DurationUnit::Milliseconds => "ms",
            DurationUnit::Seconds => "s",
            DurationUnit::Minutes => "m",
            DurationUnit::Hours => "h",
        }
    }
}

/// A non-negative duration that remembers the unit it was given in.
///
/// A bare number is read as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DittoDuration {
    amount: u64,
    unit: DurationUnit,
}

impl DittoDuration {
    pub fn new(amount: u64, unit: DurationUnit) -> Self {
        Self { amount, unit }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(millis, DurationUnit::Milliseconds)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(secs, DurationUnit::Seconds)
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn as_duration(&self) -> Duration {
        match self.unit {
            DurationUnit::Milliseconds => Duration::from_millis(self.amount),
            DurationUnit::Seconds => Duration::from_secs(self.amount),
            DurationUnit::Minutes => Duration::from_secs(self.amount.saturating_mul(60)),
            DurationUnit::Hours => Duration::from_secs(self.amount.saturating_mul(3600)),
        }
    }
}

impl From<DittoDuration> for Duration {
    fn from(duration: DittoDuration) -> Self {
        duration.as_duration()
    }
}

impl std::fmt::Display for DittoDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for DittoDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "ms" has to be tried before "m" and "s".
        let (digits, unit) = [
            DurationUnit::Milliseconds,
            DurationUnit::Seconds,
            DurationUnit::Minutes,
            DurationUnit::Hours,
        ]
        .into_iter()
        .find_map(|unit| trimmed.strip_suffix(unit.suffix()).map(|d| (d, unit)))
        .unwrap_or((trimmed, DurationUnit::Seconds));

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::InvalidDuration(s.to_string()));
        }
        let amount = digits
            .parse()
            .map_err(|_| ParseError::InvalidDuration(s.to_string()))?;
        Ok(Self::new(amount, unit))
    }
}

impl Serialize for DittoDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DittoDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
