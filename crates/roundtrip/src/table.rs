// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Target table description and the statements built from it

use crate::error::ConfigurationError;
use crate::sample::TemporalType;

const MAX_IDENTIFIER_LEN: usize = 128;

/// A table with one BIGINT key column and one temporal value column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table: String,
    pub key_column: String,
    pub value_column: String,
    /// Declared SQL type of the value column, checked by [`TableSpec::validate`]
    pub column_type: String,
}

impl TableSpec {
    pub fn new(
        table: impl Into<String>,
        key_column: impl Into<String>,
        value_column: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            key_column: key_column.into(),
            value_column: value_column.into(),
            column_type: column_type.into(),
        }
    }

    pub fn time(
        table: impl Into<String>,
        key_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self::new(table, key_column, value_column, TemporalType::Time.sql_name())
    }

    pub fn timestamp(
        table: impl Into<String>,
        key_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self::new(
            table,
            key_column,
            value_column,
            TemporalType::Timestamp.sql_name(),
        )
    }

    /// Check identifiers and the declared type, returning the type
    pub fn validate(&self) -> Result<TemporalType, ConfigurationError> {
        validate_identifier(&self.table)?;
        validate_identifier(&self.key_column)?;
        validate_identifier(&self.value_column)?;
        self.column_type.parse()
    }

    /// Destructive DDL leaving an empty table with exactly two columns
    ///
    /// Accepted aliases such as `DATETIME` are written in their canonical
    /// form. The key column holds any `i64`.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let column_type = self
            .column_type
            .parse::<TemporalType>()
            .map_or(self.column_type.as_str(), |t| t.sql_name());
        format!(
            "CREATE OR REPLACE TABLE {} ({} BIGINT, {} {})",
            self.table, self.key_column, self.value_column, column_type
        )
    }

    #[must_use]
    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?)",
            self.table, self.key_column, self.value_column
        )
    }

    #[must_use]
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = ?",
            self.value_column, self.table, self.key_column
        )
    }
}

/// Accept plain unquoted SQL identifiers only
pub fn validate_identifier(name: &str) -> Result<(), ConfigurationError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidIdentifier(name.to_string()))
    }
}
