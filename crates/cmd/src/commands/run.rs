use std::io::Write;

use anyhow::{Result, bail};
use roundtrip::{
    ConnectionConfig, DuckDbSession, RoundTripCase, Verifier, run_cases, with_session,
};

/// Run `cases` in one session and print a line per case
///
/// Fails when any case did not pass, after every line has been printed.
pub fn run_command(
    config: &ConnectionConfig,
    cases: &[RoundTripCase],
    verifier: &Verifier,
    out: &mut impl Write,
) -> Result<()> {
    let session = DuckDbSession::open(config)?;
    let outcomes = with_session(session, |session| {
        Ok::<_, anyhow::Error>(run_cases(session, verifier, cases))
    })?;

    for outcome in &outcomes {
        writeln!(out, "{outcome}")?;
    }

    let total = outcomes.len();
    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed > 0 {
        bail!("{failed} of {total} case(s) did not pass");
    }
    writeln!(out, "All {total} case(s) passed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CaseChoice;
    use roundtrip::{SampleValue, TableSpec};

    #[test]
    fn test_all_cases_pass_in_memory() -> Result<()> {
        let mut out = Vec::new();
        let cases = CaseChoice::All.cases(true)?;
        run_command(&ConnectionConfig::default(), &cases, &Verifier::new(), &mut out)?;

        let text = String::from_utf8(out)?;
        assert!(text.contains("time: PASS 12:34:56"));
        assert!(text.contains("time-midnight: PASS 00:00:00"));
        assert!(text.ends_with("All 6 case(s) passed\n"));
        Ok(())
    }

    #[test]
    fn test_error_case_fails_the_run() -> Result<()> {
        let mut out = Vec::new();
        let cases = vec![
            RoundTripCase::time_of_day()?,
            RoundTripCase::new(
                "wrong-type",
                TableSpec::time("T", "ID", "V"),
                SampleValue::now(),
            ),
        ];
        let result = run_command(&ConnectionConfig::default(), &cases, &Verifier::with_key(9), &mut out);

        let err = result.expect_err("one case is misconfigured");
        assert_eq!(err.to_string(), "1 of 2 case(s) did not pass");
        let text = String::from_utf8(out)?;
        assert!(text.contains("time: PASS"));
        assert!(text.contains("wrong-type: ERROR configuration"));
        Ok(())
    }
}
