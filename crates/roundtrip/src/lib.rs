// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Round-trip verification of TIME and TIMESTAMP values through a SQL driver
//!
//! A run recreates a two-column table, binds a sample value through the
//! driver's native temporal binding, reads it back by key and compares the
//! decoded value with the sample. A mismatch is a reported outcome, not an
//! error: it is how implicit zone conversions in a driver show up.
//!
//! The verifier only talks to the [`SqlSession`] trait. [`DuckDbSession`]
//! is the bundled implementation.

pub mod cases;
pub mod config;
pub mod decode;
mod duckdb_session;
pub mod error;
pub mod sample;
pub mod session;
pub mod table;
pub mod testing;
pub mod verifier;

pub use cases::{CaseOutcome, RoundTripCase, run_cases};
pub use config::{ConnectionConfig, SessionSetting, load_config};
pub use duckdb_session::DuckDbSession;
pub use error::{ConfigurationError, DecodeError, Step, VerifyError};
pub use sample::{SampleValue, TemporalType};
pub use session::{Cell, SessionError, SessionGuard, SqlSession, with_session};
pub use table::TableSpec;
pub use verifier::{DEFAULT_KEY, VerificationResult, Verifier};
