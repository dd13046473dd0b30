// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! SQL session seam between the verifier and a concrete driver

use crate::sample::SampleValue;
use diagnostics::*;

/// Failure reported by a session implementation
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("DuckDB error: {0}")]
    Driver(#[from] duckdb::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Raw cell as returned by the driver, before any temporal interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    /// Microseconds since midnight
    Time { micros: i64 },
    /// Microseconds since the Unix epoch, no zone
    Timestamp { micros: i64 },
    /// Days since the Unix epoch
    Date { days: i32 },
    Text(String),
    /// Any other driver type, described by name
    Other(String),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Time { micros } => write!(f, "TIME({micros}us)"),
            Cell::Timestamp { micros } => write!(f, "TIMESTAMP({micros}us)"),
            Cell::Date { days } => write!(f, "DATE({days}d)"),
            Cell::Text(s) => write!(f, "TEXT({s:?})"),
            Cell::Other(ty) => write!(f, "{ty}"),
        }
    }
}

/// An open, authenticated connection already scoped to its target schema
///
/// Every call is blocking and fully consumes its result before returning.
pub trait SqlSession {
    /// Run one or more non-parameterized statements
    fn execute_batch(&mut self, sql: &str) -> Result<(), SessionError>;

    /// Run a prepared insert binding `key` then `value` positionally,
    /// returning the number of affected rows
    fn insert_temporal(
        &mut self,
        sql: &str,
        key: i64,
        value: &SampleValue,
    ) -> Result<usize, SessionError>;

    /// Run a prepared query binding `key`, returning `column` of every row
    fn query_temporal(
        &mut self,
        sql: &str,
        key: i64,
        column: &str,
    ) -> Result<Vec<Cell>, SessionError>;

    /// Release the connection
    fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;
}

/// Owns a session for the duration of a run and closes it on every path
pub struct SessionGuard<S: SqlSession> {
    session: Option<S>,
}

impl<S: SqlSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Access the guarded session
    ///
    /// Returns `None` once the guard has been closed.
    pub fn session(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn close(mut self) -> Result<(), SessionError> {
        match self.session.take() {
            Some(session) => session.close(),
            None => Ok(()),
        }
    }
}

impl<S: SqlSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            // Reached on unwind; dropping the session still releases the driver handle
            warn!("Session guard dropped without close, closing now");
            if let Err(err) = session.close() {
                let message = err.to_string();
                error!("Failed to close session during unwind: {message}", message: message);
            }
        }
    }
}

/// Run `body` against `session`, closing the session afterwards
///
/// A close failure is returned when `body` succeeded. When `body` failed its
/// error wins and the close failure is only logged.
pub fn with_session<S, T, E, F>(session: S, body: F) -> Result<T, E>
where
    S: SqlSession,
    E: From<SessionError>,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    let mut guard = SessionGuard::new(session);
    let outcome = match guard.session() {
        Some(session) => body(session),
        None => Err(SessionError::Backend("session already closed".to_string()).into()),
    };
    let closed = guard.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            let message = close_err.to_string();
            error!("Failed to close session after error: {message}", message: message);
            Err(err)
        }
    }
}
