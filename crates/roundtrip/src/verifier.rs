// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Write a temporal value, read it back by key, compare

use crate::decode::decode;
use crate::error::{ConfigurationError, Result, Step, VerifyError};
use crate::sample::{SampleValue, TemporalType};
use crate::session::{Cell, SqlSession};
use crate::table::TableSpec;
use diagnostics::*;

/// Key used for both the insert and the select when none is configured
pub const DEFAULT_KEY: i64 = 1;

/// Outcome of one verification run
///
/// `matched == false` is a legitimate result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub expected: SampleValue,
    pub actual: SampleValue,
    pub matched: bool,
}

impl VerificationResult {
    /// Both sides are compared at whole-second precision
    #[must_use]
    pub fn new(expected: SampleValue, actual: SampleValue) -> Self {
        let expected = expected.truncated();
        let actual = actual.truncated();
        Self {
            expected,
            actual,
            matched: expected == actual,
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.matched {
            write!(f, "PASS {}", self.expected)
        } else {
            write!(f, "FAIL expected {} but read back {}", self.expected, self.actual)
        }
    }
}

/// Round-trip verifier over any [`SqlSession`]
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    key: i64,
}

impl Default for Verifier {
    fn default() -> Self {
        Self { key: DEFAULT_KEY }
    }
}

impl Verifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_key(key: i64) -> Self {
        Self { key }
    }

    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Check the table definition and that `sample` has the declared type
    ///
    /// Issues no statements.
    pub fn check(&self, table: &TableSpec, sample: &SampleValue) -> Result<TemporalType> {
        let declared = table.validate()?;
        let kind = sample.temporal_type();
        if declared != kind {
            return Err(ConfigurationError::TypeMismatch {
                declared,
                sample: kind,
            }
            .into());
        }
        Ok(declared)
    }

    /// Full run: recreate, insert, read back, decode, compare
    pub fn verify<S: SqlSession>(
        &self,
        session: &mut S,
        table: &TableSpec,
        sample: &SampleValue,
    ) -> Result<VerificationResult> {
        self.check(table, sample)?;
        let sample = &sample.truncated();

        self.recreate_table(session, table)?;
        self.insert_sample(session, table, sample)?;
        let actual = self.read_back(session, table)?;

        let result = VerificationResult::new(*sample, actual);
        let name = table.table.as_str();
        let expected = sample.to_string();
        let actual = result.actual.to_string();
        if result.matched {
            info!("Round trip matched on {name}: {expected}", name: name, expected: expected);
        } else {
            warn!(
                "Round trip mismatch on {name}: wrote {expected}, read {actual}",
                name: name,
                expected: expected,
                actual: actual
            );
        }
        Ok(result)
    }

    /// Drop and recreate the table, leaving it empty
    pub fn recreate_table<S: SqlSession>(&self, session: &mut S, table: &TableSpec) -> Result<()> {
        table.validate()?;
        session
            .execute_batch(&table.create_table_sql())
            .map_err(VerifyError::persistence(Step::CreateTable))
    }

    /// Insert `sample` under the verifier's key through parameter binding
    pub fn insert_sample<S: SqlSession>(
        &self,
        session: &mut S,
        table: &TableSpec,
        sample: &SampleValue,
    ) -> Result<()> {
        self.check(table, sample)?;
        let affected = session
            .insert_temporal(&table.insert_sql(), self.key, sample)
            .map_err(VerifyError::persistence(Step::Insert))?;
        if affected != 1 {
            let name = table.table.as_str();
            warn!(
                "Insert into {name} reported {affected} affected rows",
                name: name,
                affected: affected
            );
        }
        Ok(())
    }

    /// Select the row for the verifier's key and decode its value
    pub fn read_back<S: SqlSession>(
        &self,
        session: &mut S,
        table: &TableSpec,
    ) -> Result<SampleValue> {
        let declared = table.validate()?;
        let mut cells = session
            .query_temporal(&table.select_sql(), self.key, &table.value_column)
            .map_err(VerifyError::persistence(Step::Select))?;

        let cell: Cell = match cells.len() {
            0 => {
                return Err(VerifyError::RowNotFound {
                    table: table.table.clone(),
                    key_column: table.key_column.clone(),
                    key: self.key,
                });
            }
            1 => cells.remove(0),
            rows => {
                return Err(VerifyError::DuplicateKey {
                    table: table.table.clone(),
                    key_column: table.key_column.clone(),
                    key: self.key,
                    rows,
                });
            }
        };

        let raw = cell.to_string();
        debug!("Decoding {raw} as {declared}", raw: raw, declared: declared.sql_name());
        Ok(decode(&cell, &table.value_column, declared)?)
    }
}
