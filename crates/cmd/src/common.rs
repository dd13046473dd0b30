// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use diagnostics::*;
use roundtrip::{ConnectionConfig, RoundTripCase, load_config};

/// Environment variable naming the connection config file
pub const CONFIG_ENV: &str = "ROUNDTRIP_CONFIG";

/// Which of the standard cases to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CaseChoice {
    /// TIME column only
    Time,
    /// TIMESTAMP column only
    Timestamp,
    /// Both columns (default)
    All,
}

impl CaseChoice {
    pub fn cases(self, boundaries: bool) -> Result<Vec<RoundTripCase>> {
        let mut cases = match self {
            CaseChoice::Time => vec![RoundTripCase::time_of_day()?],
            CaseChoice::Timestamp => vec![RoundTripCase::timestamp_now()],
            CaseChoice::All => RoundTripCase::standard()?,
        };
        if boundaries {
            cases.extend(
                RoundTripCase::boundaries()?
                    .into_iter()
                    .filter(|case| self.includes(case)),
            );
        }
        Ok(cases)
    }

    fn includes(self, case: &RoundTripCase) -> bool {
        match self {
            CaseChoice::All => true,
            CaseChoice::Time => case.sample.temporal_type() == roundtrip::TemporalType::Time,
            CaseChoice::Timestamp => {
                case.sample.temporal_type() == roundtrip::TemporalType::Timestamp
            }
        }
    }
}

/// Config path from the flag, falling back to the ROUNDTRIP_CONFIG environment variable
pub fn config_path_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    override_path.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Load the connection config, or an in-memory database when none is named
pub fn resolve_config(override_path: Option<PathBuf>) -> Result<ConnectionConfig> {
    match config_path_with_override(override_path) {
        Some(path) => {
            let shown = path.display().to_string();
            info!("Loading configuration from {shown}", shown: shown);
            load_config(&path)
        }
        None => {
            debug!("No configuration given, using an in-memory database");
            Ok(ConnectionConfig::default())
        }
    }
}
