// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::table::validate_identifier;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Database name that selects a throwaway in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Connection setup handed to the session before any verification runs
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database file path, or `:memory:`
    #[serde(default = "default_database")]
    pub database: String,
    /// Schema to create if missing and select for the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<i64>,
    /// Per-session driver settings, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub session_settings: Vec<SessionSetting>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionSetting {
    pub name: String,
    pub value: String,
}

impl SessionSetting {
    pub(crate) fn to_sql(&self) -> String {
        format!("SET {} = '{}'", self.name, self.value.replace('\'', "''"))
    }
}

fn default_database() -> String {
    IN_MEMORY.to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            schema: None,
            threads: None,
            session_settings: Vec::new(),
        }
    }
}

/// Load configuration from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConnectionConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    parse_config(&content)
}

/// Parse and validate configuration from YAML text
pub fn parse_config(content: &str) -> Result<ConnectionConfig> {
    let config: ConnectionConfig =
        serde_yaml_ng::from_str(content).with_context(|| "Failed to parse YAML configuration")?;

    validate_config(&config)?;
    Ok(config)
}

pub(crate) fn validate_config(config: &ConnectionConfig) -> Result<()> {
    if config.database.trim().is_empty() {
        anyhow::bail!("database cannot be empty (use \"{IN_MEMORY}\" for an in-memory database)");
    }

    if let Some(schema) = &config.schema {
        validate_identifier(schema).with_context(|| "Invalid schema name")?;
    }

    if let Some(threads) = config.threads {
        if threads <= 0 {
            anyhow::bail!("threads must be greater than 0");
        }
    }

    for setting in &config.session_settings {
        validate_identifier(&setting.name)
            .with_context(|| format!("Invalid session setting name for value {:?}", setting.value))?;
    }

    Ok(())
}

/// Example configuration written by `roundtrip init`
#[must_use]
pub fn example_config() -> String {
    r#"# Round-trip harness connection settings
#
# database: DuckDB file path, or ":memory:" for a throwaway database
database: ":memory:"

# schema: created when missing and selected for the session
schema: roundtrip

# threads: DuckDB worker threads for this session
threads: 1

# session_settings: applied in order as SET name = 'value'
session_settings:
  - name: default_null_order
    value: nulls_last
"#
    .to_string()
}
