// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for round-trip verification
use crate::sample::TemporalType;
use crate::session::SessionError;

/// Problems with the table definition or the sample value, found before any I/O
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unsupported temporal column type: {0}")]
    UnsupportedType(String),

    #[error("Sample value is a {sample} but the column is declared {declared}")]
    TypeMismatch {
        declared: TemporalType,
        sample: TemporalType,
    },

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Invalid time of day: {hour:02}:{minute:02}:{second:02}")]
    InvalidTimeOfDay { hour: u32, minute: u32, second: u32 },

    #[error("Invalid {expected} value: {input:?}")]
    InvalidValue {
        expected: TemporalType,
        input: String,
    },
}

/// The driver returned a cell that cannot be read as the declared type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot decode column {column} as {declared}: driver returned {found}")]
pub struct DecodeError {
    pub column: String,
    pub declared: TemporalType,
    pub found: String,
}

/// Step of a verification run, used to label persistence failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateTable,
    Insert,
    Select,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::CreateTable => write!(f, "create table"),
            Step::Insert => write!(f, "insert"),
            Step::Select => write!(f, "select"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Persistence error during {step}: {source}")]
    Persistence {
        step: Step,
        #[source]
        source: SessionError,
    },

    #[error("No row found for {key_column} = {key} in {table}")]
    RowNotFound {
        table: String,
        key_column: String,
        key: i64,
    },

    #[error("Expected one row for {key_column} = {key} in {table}, found {rows}")]
    DuplicateKey {
        table: String,
        key_column: String,
        key: i64,
        rows: usize,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl VerifyError {
    pub(crate) fn persistence(step: Step) -> impl FnOnce(SessionError) -> VerifyError {
        move |source| VerifyError::Persistence { step, source }
    }

    /// Stable label for reports
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            VerifyError::Configuration(_) => "configuration",
            VerifyError::Persistence { .. } => "persistence",
            VerifyError::RowNotFound { .. } => "row-not-found",
            VerifyError::DuplicateKey { .. } => "duplicate-key",
            VerifyError::Decode(_) => "decode",
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
