// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! [`SqlSession`] backed by an embedded DuckDB connection

use crate::config::{ConnectionConfig, IN_MEMORY};
use crate::sample::SampleValue;
use crate::session::{Cell, SessionError, SqlSession};
use diagnostics::*;
use duckdb::types::{TimeUnit, Value};
use duckdb::{Connection, params};

pub struct DuckDbSession {
    conn: Connection,
}

impl DuckDbSession {
    /// Open the configured database and scope the session
    ///
    /// Session settings are applied in order, then the schema is created
    /// if needed and selected.
    pub fn open(config: &ConnectionConfig) -> Result<Self, SessionError> {
        let mut flags = duckdb::Config::default();
        if let Some(threads) = config.threads {
            flags = flags.threads(threads)?;
        }

        let database = config.database.as_str();
        let conn = if database == IN_MEMORY {
            Connection::open_in_memory_with_flags(flags)?
        } else {
            Connection::open_with_flags(database, flags)?
        };
        info!("Opened DuckDB session on {database}", database: database);

        let mut session = Self { conn };
        for setting in &config.session_settings {
            session.execute_batch(&setting.to_sql())?;
        }
        if let Some(schema) = &config.schema {
            session.execute_batch(&format!(
                "CREATE SCHEMA IF NOT EXISTS {schema}; SET schema = '{schema}';"
            ))?;
        }
        Ok(session)
    }

    pub fn open_in_memory() -> Result<Self, SessionError> {
        Self::open(&ConnectionConfig::default())
    }
}

impl SqlSession for DuckDbSession {
    fn execute_batch(&mut self, sql: &str) -> Result<(), SessionError> {
        debug!("SQL: {sql}", sql: sql);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn insert_temporal(
        &mut self,
        sql: &str,
        key: i64,
        value: &SampleValue,
    ) -> Result<usize, SessionError> {
        let bound = value.to_string();
        debug!("SQL: {sql} with key {key}, value {bound}", sql: sql, key: key, bound: bound);
        let mut stmt = self.conn.prepare(sql)?;
        let affected = match value {
            SampleValue::Time(t) => stmt.execute(params![key, *t])?,
            SampleValue::Timestamp(ts) => stmt.execute(params![key, *ts])?,
        };
        Ok(affected)
    }

    fn query_temporal(
        &mut self,
        sql: &str,
        key: i64,
        column: &str,
    ) -> Result<Vec<Cell>, SessionError> {
        debug!("SQL: {sql} with key {key}", sql: sql, key: key);
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![key])?;

        let mut cells = Vec::new();
        while let Some(row) = rows.next()? {
            let value: Value = row.get(column)?;
            cells.push(cell_from_value(value));
        }
        let count = cells.len();
        debug!("Query returned {count} row(s)", count: count);
        Ok(cells)
    }

    fn close(self) -> Result<(), SessionError> {
        self.conn.close().map_err(|(_, err)| SessionError::Driver(err))?;
        debug!("Closed DuckDB session");
        Ok(())
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value * 1_000_000,
        TimeUnit::Millisecond => value * 1_000,
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn cell_from_value(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Time64(unit, v) => Cell::Time {
            micros: to_micros(unit, v),
        },
        Value::Timestamp(unit, v) => Cell::Timestamp {
            micros: to_micros(unit, v),
        },
        Value::Date32(days) => Cell::Date { days },
        Value::Text(s) => Cell::Text(s),
        other => Cell::Other(format!("{other:?}")),
    }
}
