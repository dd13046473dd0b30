// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cmd::commands::{check_command, init_command, run_command};
use cmd::common::{CaseChoice, resolve_config};
use diagnostics::LogLevel;
use roundtrip::{DEFAULT_KEY, TableSpec, TemporalType, Verifier};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "roundtrip")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log every statement (same as ROUNDTRIP_LOG=debug when unset)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example connection configuration
    Init {
        /// Where to write the configuration
        #[arg(default_value = "roundtrip.yaml")]
        path: PathBuf,
    },
    /// Run the standard TIME and TIMESTAMP round trips
    Run(RunArgs),
    /// Round-trip a single value
    Check(CheckArgs),
}

#[derive(Args)]
struct ConnectionArgs {
    /// Connection config file (falls back to ROUNDTRIP_CONFIG, then an in-memory database)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Key bound for both the insert and the select
    #[arg(long, default_value_t = DEFAULT_KEY)]
    key: i64,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Which cases to run
    #[arg(long, value_enum, default_value_t = CaseChoice::All)]
    case: CaseChoice,
    /// Also run midnight and 23:59:59 values
    #[arg(long)]
    boundaries: bool,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Declared column type (TIME or TIMESTAMP)
    #[arg(long = "type", value_parser = parse_type)]
    column_type: TemporalType,
    /// Value to write: HH:MM:SS for TIME, YYYY-MM-DD HH:MM:SS or "now" for TIMESTAMP
    #[arg(long)]
    value: String,
    /// Table to recreate for the check
    #[arg(long, default_value = "ROUNDTRIP_CHECK")]
    table: String,
}

fn parse_type(s: &str) -> Result<TemporalType, String> {
    s.parse().map_err(|e: roundtrip::ConfigurationError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let fallback = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Off
    };
    diagnostics::init_with_fallback(fallback);

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Init { path } => init_command(&path, &mut out),
        Commands::Run(args) => {
            let config = resolve_config(args.connection.config)?;
            let cases = args.case.cases(args.boundaries)?;
            run_command(&config, &cases, &Verifier::with_key(args.connection.key), &mut out)
        }
        Commands::Check(args) => {
            let config = resolve_config(args.connection.config)?;
            let table = TableSpec::new(args.table, "ID", "TEST_VALUE", args.column_type.sql_name());
            check_command(
                &config,
                &table,
                &args.value,
                &Verifier::with_key(args.connection.key),
                &mut out,
            )
        }
    }
}
