use std::io::Write;

use anyhow::{Result, bail};
use roundtrip::{
    ConnectionConfig, DuckDbSession, SampleValue, TableSpec, Verifier, with_session,
};

/// Verify a single user-supplied value against `table`
pub fn check_command(
    config: &ConnectionConfig,
    table: &TableSpec,
    value: &str,
    verifier: &Verifier,
    out: &mut impl Write,
) -> Result<()> {
    // Both checks happen before the database is opened
    let kind = table.validate()?;
    let sample = SampleValue::parse(kind, value)?;

    let session = DuckDbSession::open(config)?;
    let result = with_session(session, |session| {
        Ok::<_, anyhow::Error>(verifier.verify(session, table, &sample)?)
    })?;

    writeln!(out, "{}: {}", table.table, result)?;
    if !result.matched {
        bail!("Round trip through {} did not preserve the value", table.table);
    }
    Ok(())
}
