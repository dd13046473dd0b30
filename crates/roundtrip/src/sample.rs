// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Semantic temporal values written to and read back from a table

use crate::error::ConfigurationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};
use std::str::FromStr;

const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Temporal SQL column types the harness knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalType {
    /// Time of day, no date, no zone
    Time,
    /// Date and time, no zone
    Timestamp,
}

impl TemporalType {
    /// Canonical SQL spelling used in DDL
    #[must_use]
    pub fn sql_name(self) -> &'static str {
        match self {
            TemporalType::Time => "TIME",
            TemporalType::Timestamp => "TIMESTAMP",
        }
    }
}

impl std::fmt::Display for TemporalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl FromStr for TemporalType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TIME" => Ok(TemporalType::Time),
            "TIMESTAMP" | "DATETIME" | "TIMESTAMP_NTZ" => Ok(TemporalType::Timestamp),
            _ => Err(ConfigurationError::UnsupportedType(s.to_string())),
        }
    }
}

/// A time-of-day or a timestamp
///
/// The constructors produce whole seconds. Values built from the variants
/// directly are truncated by the verifier before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleValue {
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl SampleValue {
    pub fn time_of_day(hour: u32, minute: u32, second: u32) -> Result<Self, ConfigurationError> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(SampleValue::Time)
            .ok_or(ConfigurationError::InvalidTimeOfDay {
                hour,
                minute,
                second,
            })
    }

    #[must_use]
    pub fn time(value: NaiveTime) -> Self {
        SampleValue::Time(value.trunc_subsecs(0))
    }

    #[must_use]
    pub fn timestamp(value: NaiveDateTime) -> Self {
        SampleValue::Timestamp(value.trunc_subsecs(0))
    }

    /// Midnight at the start of `date`
    #[must_use]
    pub fn start_of_day(date: NaiveDate) -> Self {
        SampleValue::Timestamp(date.and_time(NaiveTime::default()))
    }

    /// Current UTC instant truncated to seconds
    #[must_use]
    pub fn now() -> Self {
        Self::timestamp(Utc::now().naive_utc())
    }

    /// Parse user input into a sample of the given type
    ///
    /// Times take `HH:MM:SS`; timestamps take `YYYY-MM-DD HH:MM:SS`, the
    /// `T`-separated form, or `now`.
    pub fn parse(kind: TemporalType, input: &str) -> Result<Self, ConfigurationError> {
        let trimmed = input.trim();
        let invalid = || ConfigurationError::InvalidValue {
            expected: kind,
            input: input.to_string(),
        };
        match kind {
            TemporalType::Time => NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                .map(Self::time)
                .map_err(|_| invalid()),
            TemporalType::Timestamp if trimmed.eq_ignore_ascii_case("now") => Ok(Self::now()),
            TemporalType::Timestamp => parse_timestamp(trimmed)
                .map(Self::timestamp)
                .ok_or_else(invalid),
        }
    }

    /// Drop any fractional second
    #[must_use]
    pub fn truncated(self) -> Self {
        match self {
            SampleValue::Time(t) => Self::time(t),
            SampleValue::Timestamp(ts) => Self::timestamp(ts),
        }
    }

    #[must_use]
    pub fn temporal_type(&self) -> TemporalType {
        match self {
            SampleValue::Time(_) => TemporalType::Time,
            SampleValue::Timestamp(_) => TemporalType::Timestamp,
        }
    }
}

impl std::fmt::Display for SampleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            SampleValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

pub(crate) fn parse_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input, TIME_FORMAT).ok()
}

pub(crate) fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_rejects_out_of_range() {
        assert!(SampleValue::time_of_day(23, 59, 59).is_ok());
        assert_eq!(
            SampleValue::time_of_day(24, 0, 0),
            Err(ConfigurationError::InvalidTimeOfDay {
                hour: 24,
                minute: 0,
                second: 0
            })
        );
        assert!(SampleValue::time_of_day(12, 60, 0).is_err());
    }

    #[test]
    fn test_constructors_truncate_to_seconds() {
        let t = NaiveTime::from_hms_milli_opt(12, 34, 56, 789).expect("valid time");
        assert_eq!(SampleValue::time(t).to_string(), "12:34:56");
        assert_eq!(
            SampleValue::time(t),
            SampleValue::time_of_day(12, 34, 56).expect("valid time")
        );

        let SampleValue::Timestamp(now) = SampleValue::now() else {
            panic!("now() must be a timestamp");
        };
        assert_eq!(chrono::Timelike::nanosecond(&now), 0);
    }

    #[test]
    fn test_temporal_type_parsing() {
        assert_eq!("time".parse::<TemporalType>(), Ok(TemporalType::Time));
        assert_eq!(" TIMESTAMP ".parse::<TemporalType>(), Ok(TemporalType::Timestamp));
        assert_eq!("datetime".parse::<TemporalType>(), Ok(TemporalType::Timestamp));
        assert_eq!(
            "DATE".parse::<TemporalType>(),
            Err(ConfigurationError::UnsupportedType("DATE".to_string()))
        );
        assert!("TIMESTAMPTZ".parse::<TemporalType>().is_err());
    }

    #[test]
    fn test_parse_user_input() {
        let time = SampleValue::parse(TemporalType::Time, "00:00:00").expect("midnight");
        assert_eq!(time.to_string(), "00:00:00");

        let ts = SampleValue::parse(TemporalType::Timestamp, "2024-02-29T23:59:59")
            .expect("leap day");
        assert_eq!(ts.to_string(), "2024-02-29 23:59:59");
        assert_eq!(ts.temporal_type(), TemporalType::Timestamp);

        assert!(SampleValue::parse(TemporalType::Timestamp, "now").is_ok());
        assert!(matches!(
            SampleValue::parse(TemporalType::Time, "noon"),
            Err(ConfigurationError::InvalidValue { .. })
        ));
        assert!(SampleValue::parse(TemporalType::Timestamp, "12:00:00").is_err());
    }
}
