// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the round-trip harness
//!
//! Thin wrapper over `emit` writing to stderr through `emit_term`.
//!
//! Usage:
//! - Set ROUNDTRIP_LOG=off (default) - no logs
//! - Set ROUNDTRIP_LOG=info - verification outcomes
//! - Set ROUNDTRIP_LOG=debug - every SQL statement and decode step

use std::str::FromStr;
use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "ROUNDTRIP_LOG";

static INIT: Once = Once::new();

/// Log verbosity accepted in `ROUNDTRIP_LOG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl LogLevel {
    fn emit_level(self) -> Option<emit::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(emit::Level::Error),
            LogLevel::Warn => Some(emit::Level::Warn),
            LogLevel::Info => Some(emit::Level::Info),
            LogLevel::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Initialize diagnostics based on the ROUNDTRIP_LOG environment variable
///
/// Safe to call multiple times; only the first call has an effect.
pub fn init_diagnostics() {
    init_with_fallback(LogLevel::Off);
}

/// Initialize diagnostics, using `fallback` when ROUNDTRIP_LOG is unset
///
/// The CLI passes `LogLevel::Debug` here for `--verbose`.
pub fn init_with_fallback(fallback: LogLevel) {
    INIT.call_once(|| {
        let level = match std::env::var(LOG_ENV) {
            Ok(value) => match value.parse::<LogLevel>() {
                Ok(level) => level,
                Err(msg) => {
                    // Bootstrap warning, emit is not installed yet
                    eprintln!("Warning: {msg} in {LOG_ENV}, using 'info'");
                    LogLevel::Info
                }
            },
            Err(_) => fallback,
        };

        let Some(min) = level.emit_level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        // Runtime lives for the whole process
        std::mem::forget(rt);
    });
}

/// Log basic operations (verification outcomes, session setup)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (SQL statements, decoded cells)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (value mismatches, suspicious row counts)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log error conditions (failed statements, close failures)
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

// Short-name versions

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
