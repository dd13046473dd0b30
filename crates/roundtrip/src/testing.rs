// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory session for exercising the verifier
//!
//! Models a single two-column table and lets tests inject driver defects:
//! shifted TIME values, dates attached to TIME values, swallowed inserts,
//! duplicated rows, fixed result cells and failing statements.

use crate::error::Step;
use crate::sample::SampleValue;
use crate::session::{Cell, SessionError, SqlSession};
use chrono::{NaiveDate, TimeDelta, Timelike};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ScriptedSession {
    rows: Vec<(i64, Cell)>,
    log: Vec<String>,
    shift_hours: i64,
    time_as_timestamp: bool,
    drop_inserts: bool,
    duplicate_rows: bool,
    return_cell: Option<Cell>,
    fail_at: Option<Step>,
    fail_close: bool,
    closed: Arc<AtomicBool>,
}

impl ScriptedSession {
    /// A driver that stores and returns values unchanged
    #[must_use]
    pub fn faithful() -> Self {
        Self::default()
    }

    /// Apply an hour offset to TIME values on insert, like a driver
    /// converting through a session time zone
    #[must_use]
    pub fn shift_time_hours(mut self, hours: i64) -> Self {
        self.shift_hours = hours;
        self
    }

    /// Return TIME values as timestamps on 1970-01-02
    #[must_use]
    pub fn time_as_timestamp(mut self) -> Self {
        self.time_as_timestamp = true;
        self
    }

    /// Acknowledge inserts without storing anything
    #[must_use]
    pub fn drop_inserts(mut self) -> Self {
        self.drop_inserts = true;
        self
    }

    /// Store every inserted row twice
    #[must_use]
    pub fn duplicate_rows(mut self) -> Self {
        self.duplicate_rows = true;
        self
    }

    /// Replace every selected cell with `cell`
    #[must_use]
    pub fn return_cell(mut self, cell: Cell) -> Self {
        self.return_cell = Some(cell);
        self
    }

    /// Fail the statement issued for `step`
    #[must_use]
    pub fn fail_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    #[must_use]
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Statements issued so far, with bound parameters in brackets
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Flag set once the session has been closed
    #[must_use]
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn check_failure(&self, step: Step) -> Result<(), SessionError> {
        if self.fail_at == Some(step) {
            return Err(SessionError::Backend(format!("scripted {step} failure")));
        }
        Ok(())
    }

    fn store(&self, value: &SampleValue) -> Cell {
        match value {
            SampleValue::Time(t) => {
                let (shifted, _) = t.overflowing_add_signed(TimeDelta::hours(self.shift_hours));
                let micros = i64::from(shifted.num_seconds_from_midnight()) * 1_000_000;
                if self.time_as_timestamp {
                    let day = NaiveDate::from_ymd_opt(1970, 1, 2)
                        .map(|d| d.and_time(shifted).and_utc().timestamp_micros())
                        .unwrap_or(micros);
                    Cell::Timestamp { micros: day }
                } else {
                    Cell::Time { micros }
                }
            }
            SampleValue::Timestamp(ts) => Cell::Timestamp {
                micros: ts.and_utc().timestamp_micros(),
            },
        }
    }
}

impl SqlSession for ScriptedSession {
    fn execute_batch(&mut self, sql: &str) -> Result<(), SessionError> {
        self.log.push(sql.to_string());
        if sql.starts_with("CREATE OR REPLACE TABLE") {
            self.check_failure(Step::CreateTable)?;
            self.rows.clear();
        }
        Ok(())
    }

    fn insert_temporal(
        &mut self,
        sql: &str,
        key: i64,
        value: &SampleValue,
    ) -> Result<usize, SessionError> {
        self.log.push(format!("{sql} [{key}, {value}]"));
        self.check_failure(Step::Insert)?;
        if self.drop_inserts {
            return Ok(1);
        }
        let cell = self.store(value);
        if self.duplicate_rows {
            self.rows.push((key, cell.clone()));
        }
        self.rows.push((key, cell));
        Ok(1)
    }

    fn query_temporal(
        &mut self,
        sql: &str,
        key: i64,
        _column: &str,
    ) -> Result<Vec<Cell>, SessionError> {
        self.log.push(format!("{sql} [{key}]"));
        self.check_failure(Step::Select)?;
        Ok(self
            .rows
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, cell)| self.return_cell.clone().unwrap_or_else(|| cell.clone()))
            .collect())
    }

    fn close(self) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(SessionError::Backend("scripted close failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::sample::TemporalType;

    #[test]
    fn test_shift_wraps_around_midnight() -> Result<(), SessionError> {
        let mut session = ScriptedSession::faithful().shift_time_hours(-1);
        let midnight = SampleValue::time_of_day(0, 30, 0)
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        session.insert_temporal("INSERT", 1, &midnight)?;
        let cells = session.query_temporal("SELECT", 1, "v")?;
        assert_eq!(
            cells,
            vec![Cell::Time {
                micros: (23 * 3600 + 30 * 60) * 1_000_000
            }]
        );
        Ok(())
    }

    #[test]
    fn test_time_as_timestamp_decodes_to_same_time() -> Result<(), SessionError> {
        let mut session = ScriptedSession::faithful().time_as_timestamp();
        let value = SampleValue::time_of_day(23, 59, 59)
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        session.insert_temporal("INSERT", 1, &value)?;
        let cells = session.query_temporal("SELECT", 1, "v")?;
        assert!(matches!(cells.as_slice(), [Cell::Timestamp { .. }]));
        assert_eq!(decode(&cells[0], "v", TemporalType::Time), Ok(value));
        Ok(())
    }

    #[test]
    fn test_recreate_clears_rows() -> Result<(), SessionError> {
        let mut session = ScriptedSession::faithful();
        session.insert_temporal("INSERT", 1, &SampleValue::now())?;
        session.execute_batch("CREATE OR REPLACE TABLE t (k INTEGER, v TIMESTAMP)")?;
        assert!(session.query_temporal("SELECT", 1, "v")?.is_empty());
        Ok(())
    }
}
