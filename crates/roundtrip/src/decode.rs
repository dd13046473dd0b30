// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Interpret a raw driver cell as the column's declared temporal type
//!
//! For TIME columns any date the driver attached is dropped; the time of
//! day is kept as the driver reported it. All results are whole seconds.

use crate::error::DecodeError;
use crate::sample::{SampleValue, TemporalType, parse_time, parse_timestamp};
use crate::session::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

const MICROS_PER_SECOND: i64 = 1_000_000;

pub fn decode(cell: &Cell, column: &str, declared: TemporalType) -> Result<SampleValue, DecodeError> {
    let decoded = match declared {
        TemporalType::Time => decode_time(cell).map(SampleValue::time),
        TemporalType::Timestamp => decode_timestamp(cell).map(SampleValue::timestamp),
    };
    decoded.ok_or_else(|| DecodeError {
        column: column.to_string(),
        declared,
        found: cell.to_string(),
    })
}

fn decode_time(cell: &Cell) -> Option<NaiveTime> {
    match cell {
        Cell::Time { micros } => time_from_micros(*micros),
        Cell::Timestamp { micros } => timestamp_from_micros(*micros).map(|ts| ts.time()),
        Cell::Text(s) => {
            let s = s.trim();
            parse_time(s).or_else(|| parse_timestamp(s).map(|ts| ts.time()))
        }
        Cell::Null | Cell::Date { .. } | Cell::Other(_) => None,
    }
}

fn decode_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Timestamp { micros } => timestamp_from_micros(*micros),
        Cell::Date { days } => date_from_days(*days).map(|d| d.and_time(NaiveTime::default())),
        Cell::Text(s) => parse_timestamp(s.trim()),
        Cell::Null | Cell::Time { .. } | Cell::Other(_) => None,
    }
}

fn time_from_micros(micros: i64) -> Option<NaiveTime> {
    if micros < 0 {
        return None;
    }
    let secs = u32::try_from(micros / MICROS_PER_SECOND).ok()?;
    let nanos = u32::try_from((micros % MICROS_PER_SECOND) * 1_000).ok()?;
    // None for 24:00:00 and beyond
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
}

fn timestamp_from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(TimeDelta::try_days(i64::from(days))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32, s: u32) -> SampleValue {
        SampleValue::time_of_day(h, m, s).expect("valid time")
    }

    fn ts(input: &str) -> SampleValue {
        SampleValue::parse(TemporalType::Timestamp, input).expect("valid timestamp")
    }

    #[test]
    fn test_time_cells() {
        let noonish = Cell::Time {
            micros: 45_296_000_000,
        };
        assert_eq!(decode(&noonish, "v", TemporalType::Time), Ok(time(12, 34, 56)));

        let midnight = Cell::Time { micros: 0 };
        assert_eq!(decode(&midnight, "v", TemporalType::Time), Ok(time(0, 0, 0)));

        let last = Cell::Time {
            micros: 86_399_999_999,
        };
        assert_eq!(decode(&last, "v", TemporalType::Time), Ok(time(23, 59, 59)));

        let end_of_day = Cell::Time {
            micros: 86_400_000_000,
        };
        assert!(decode(&end_of_day, "v", TemporalType::Time).is_err());
        assert!(decode(&Cell::Time { micros: -1 }, "v", TemporalType::Time).is_err());
    }

    #[test]
    fn test_time_strips_injected_date() {
        // 1970-01-02 12:34:56
        let cell = Cell::Timestamp {
            micros: (86_400 + 45_296) * MICROS_PER_SECOND,
        };
        assert_eq!(decode(&cell, "v", TemporalType::Time), Ok(time(12, 34, 56)));

        let text = Cell::Text("1970-01-01 07:34:56".to_string());
        assert_eq!(decode(&text, "v", TemporalType::Time), Ok(time(7, 34, 56)));

        let plain = Cell::Text("23:59:59.5".to_string());
        assert_eq!(decode(&plain, "v", TemporalType::Time), Ok(time(23, 59, 59)));
    }

    #[test]
    fn test_timestamp_cells() {
        let cell = Cell::Timestamp {
            micros: 1_704_067_200 * MICROS_PER_SECOND + 250_000,
        };
        assert_eq!(
            decode(&cell, "v", TemporalType::Timestamp),
            Ok(ts("2024-01-01 00:00:00"))
        );

        let before_epoch = Cell::Timestamp {
            micros: -MICROS_PER_SECOND,
        };
        assert_eq!(
            decode(&before_epoch, "v", TemporalType::Timestamp),
            Ok(ts("1969-12-31 23:59:59"))
        );

        let date = Cell::Date { days: 19_723 };
        assert_eq!(
            decode(&date, "v", TemporalType::Timestamp),
            Ok(ts("2024-01-01 00:00:00"))
        );

        let text = Cell::Text("2024-01-01T23:59:59".to_string());
        assert_eq!(
            decode(&text, "v", TemporalType::Timestamp),
            Ok(ts("2024-01-01 23:59:59"))
        );
    }

    #[test]
    fn test_wrong_shapes_are_decode_errors() {
        let err = decode(&Cell::Null, "TEST_TIME", TemporalType::Time).expect_err("null");
        assert_eq!(err.column, "TEST_TIME");
        assert_eq!(err.declared, TemporalType::Time);
        assert_eq!(err.found, "NULL");

        let time_only = Cell::Time { micros: 0 };
        assert!(decode(&time_only, "v", TemporalType::Timestamp).is_err());
        assert!(decode(&Cell::Date { days: 0 }, "v", TemporalType::Time).is_err());
        assert!(decode(&Cell::Other("Int(1)".to_string()), "v", TemporalType::Time).is_err());
        assert!(decode(&Cell::Text("soon".to_string()), "v", TemporalType::Timestamp).is_err());
    }
}
