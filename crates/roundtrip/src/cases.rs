// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Named verification cases and a sequential runner

use crate::error::{ConfigurationError, VerifyError};
use crate::sample::{SampleValue, TemporalType};
use crate::session::SqlSession;
use crate::table::TableSpec;
use crate::verifier::{VerificationResult, Verifier};
use diagnostics::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripCase {
    pub name: String,
    pub table: TableSpec,
    pub sample: SampleValue,
}

impl RoundTripCase {
    pub fn new(name: impl Into<String>, table: TableSpec, sample: SampleValue) -> Self {
        Self {
            name: name.into(),
            table,
            sample,
        }
    }

    /// TIME column holding 12:34:56
    pub fn time_of_day() -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            "time",
            time_table(),
            SampleValue::time_of_day(12, 34, 56)?,
        ))
    }

    /// TIMESTAMP column holding the current instant
    #[must_use]
    pub fn timestamp_now() -> Self {
        Self::new("timestamp", timestamp_table(), SampleValue::now())
    }

    /// The two primary cases
    pub fn standard() -> Result<Vec<Self>, ConfigurationError> {
        Ok(vec![Self::time_of_day()?, Self::timestamp_now()])
    }

    /// Values on either edge of a day
    pub fn boundaries() -> Result<Vec<Self>, ConfigurationError> {
        let last_day = |time: &str| {
            SampleValue::parse(TemporalType::Timestamp, &format!("2024-12-31 {time}"))
        };

        Ok(vec![
            Self::new(
                "time-midnight",
                time_table(),
                SampleValue::time_of_day(0, 0, 0)?,
            ),
            Self::new(
                "time-end-of-day",
                time_table(),
                SampleValue::time_of_day(23, 59, 59)?,
            ),
            Self::new("timestamp-midnight", timestamp_table(), last_day("00:00:00")?),
            Self::new(
                "timestamp-end-of-day",
                timestamp_table(),
                last_day("23:59:59")?,
            ),
        ])
    }
}

fn time_table() -> TableSpec {
    TableSpec::time("TIME_TEST", "ID", "TEST_TIME")
}

fn timestamp_table() -> TableSpec {
    TableSpec::timestamp("DATETIME_TEST", "ID", "TEST_DATETIME")
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub result: Result<VerificationResult, VerifyError>,
}

impl CaseOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(result) if result.matched)
    }
}

impl std::fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Ok(result) => write!(f, "{}: {}", self.name, result),
            Err(err) => write!(f, "{}: ERROR {} ({})", self.name, err.category(), err),
        }
    }
}

/// Run each case in order; a failing case does not stop the rest
pub fn run_cases<S: SqlSession>(
    session: &mut S,
    verifier: &Verifier,
    cases: &[RoundTripCase],
) -> Vec<CaseOutcome> {
    cases
        .iter()
        .map(|case| {
            let name = case.name.as_str();
            debug!("Running case {name}", name: name);
            let result = verifier.verify(session, &case.table, &case.sample);
            if let Err(err) = &result {
                let category = err.category();
                let message = err.to_string();
                error!(
                    "Case {name} failed ({category}): {message}",
                    name: name,
                    category: category,
                    message: message
                );
            }
            CaseOutcome {
                name: case.name.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Step;
    use crate::testing::ScriptedSession;

    #[test]
    fn test_standard_cases() -> Result<(), ConfigurationError> {
        let cases = RoundTripCase::standard()?;
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].sample.to_string(), "12:34:56");
        assert_eq!(cases[0].table.table, "TIME_TEST");
        assert_eq!(cases[1].table.column_type, "TIMESTAMP");
        for case in &cases {
            assert!(Verifier::new().check(&case.table, &case.sample).is_ok());
        }
        Ok(())
    }

    #[test]
    fn test_boundary_values() -> Result<(), ConfigurationError> {
        let rendered: Vec<String> = RoundTripCase::boundaries()?
            .iter()
            .map(|c| c.sample.to_string())
            .collect();
        assert_eq!(
            rendered,
            [
                "00:00:00",
                "23:59:59",
                "2024-12-31 00:00:00",
                "2024-12-31 23:59:59"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_runner_continues_after_failure() -> Result<(), ConfigurationError> {
        let mut session = ScriptedSession::faithful().fail_at(Step::Insert);
        let mut cases = RoundTripCase::standard()?;
        cases.insert(
            1,
            RoundTripCase::new(
                "mismatched",
                TableSpec::time("T", "ID", "V"),
                SampleValue::now(),
            ),
        );

        let outcomes = run_cases(&mut session, &Verifier::new(), &cases);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| !o.passed()));
        assert!(outcomes[0].to_string().starts_with("time: ERROR persistence"));
        assert!(outcomes[1].to_string().starts_with("mismatched: ERROR configuration"));
        Ok(())
    }

    #[test]
    fn test_runner_reports_mismatch() -> Result<(), ConfigurationError> {
        let mut session = ScriptedSession::faithful().shift_time_hours(3);
        let outcomes = run_cases(&mut session, &Verifier::new(), &RoundTripCase::standard()?);
        assert!(!outcomes[0].passed());
        assert_eq!(
            outcomes[0].to_string(),
            "time: FAIL expected 12:34:56 but read back 15:34:56"
        );
        assert!(outcomes[1].passed());
        Ok(())
    }
}
