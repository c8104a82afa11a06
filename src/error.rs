//! Error taxonomy.
//!
//! Two classes of failure exist:
//!
//! - **Request-fatal**: [`SchemaError`], unknown metric names, malformed
//!   constraints or weights, invalid configuration. These abort the whole
//!   request and never yield partial results.
//! - **Candidate-scoped**: [`DecodeError`]. A filter pass records it against
//!   the one candidate and continues with the rest.
//!
//! "Zero feasible candidates" is not an error; it is reported in results.
//! The one exception is sensitivity analysis, which refuses to compute rank
//! deltas against an empty baseline ([`DecisionError::NoFeasibleBaseline`]).

use std::fmt;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DecisionError>;

/// Errors raised by the decision-support core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// One or more catalog records are missing fields or hold invalid values.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A solution code does not follow the `[AG_]<JOIN>_<BARS>_L<LEN>` grammar.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A constraint, weight, Pareto metric or sensitivity target names a
    /// metric that does not exist.
    #[error("unknown metric '{name}'")]
    UnknownMetric { name: String },

    /// A boundary-level constraint string could not be parsed.
    #[error("invalid constraint '{input}': {reason}")]
    InvalidConstraint { input: String, reason: String },

    /// A weight is negative or not finite.
    #[error("invalid weight for {metric}: {value}")]
    InvalidWeight { metric: String, value: f64 },

    /// A configuration struct failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sensitivity analysis was requested but the baseline has no feasible
    /// candidate to rank.
    #[error(
        "sensitivity analysis skipped: baseline has no feasible candidates \
         ({rejected} rejected, {skipped} undecodable)"
    )]
    NoFeasibleBaseline { rejected: usize, skipped: usize },
}

/// Aggregated catalog validation failure.
///
/// Holds one [`RecordProblem`] per offending candidate, covering the whole
/// catalog rather than stopping at the first bad record.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct SchemaError {
    /// Problems, ordered by candidate code.
    pub problems: Vec<RecordProblem>,
}

impl SchemaError {
    /// Codes of every candidate that failed validation.
    pub fn codes(&self) -> Vec<&str> {
        self.problems.iter().map(|p| p.code.as_str()).collect()
    }

    /// Looks up the problem report for a given candidate code.
    pub fn problem_for(&self, code: &str) -> Option<&RecordProblem> {
        self.problems.iter().find(|p| p.code == code)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "catalog schema violation in {} record(s)",
            self.problems.len()
        )?;
        for problem in &self.problems {
            write!(f, "; {problem}")?;
        }
        Ok(())
    }
}

/// Everything wrong with a single catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordProblem {
    /// Candidate code of the offending record.
    pub code: String,
    /// Required fields absent from the record.
    pub missing_fields: Vec<&'static str>,
    /// Present fields whose value breaks an invariant, with the reason.
    pub invalid_fields: Vec<(&'static str, String)>,
}

impl fmt::Display for RecordProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.code)?;
        if !self.missing_fields.is_empty() {
            write!(f, " missing [{}]", self.missing_fields.join(", "))?;
        }
        for (field, reason) in &self.invalid_fields {
            write!(f, " {field} {reason}")?;
        }
        Ok(())
    }
}

/// A solution code that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode solution code '{code}': {reason}")]
pub struct DecodeError {
    /// The offending code, verbatim.
    pub code: String,
    /// What was wrong with it.
    pub reason: String,
}

impl DecodeError {
    pub(crate) fn new(code: &str, reason: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_record() {
        let err = SchemaError {
            problems: vec![
                RecordProblem {
                    code: "AG_EM_5a8_L50".into(),
                    missing_fields: vec!["manhours", "co2_tonnes"],
                    invalid_fields: vec![],
                },
                RecordProblem {
                    code: "TR_6_L10".into(),
                    missing_fields: vec![],
                    invalid_fields: vec![("duration_days", "must be positive, got 0".into())],
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 record(s)"));
        assert!(msg.contains("AG_EM_5a8_L50: missing [manhours, co2_tonnes]"));
        assert!(msg.contains("TR_6_L10: duration_days must be positive"));
        assert_eq!(err.codes(), vec!["AG_EM_5a8_L50", "TR_6_L10"]);
        assert!(err.problem_for("TR_6_L10").is_some());
        assert!(err.problem_for("EM_6_L10").is_none());
    }

    #[test]
    fn test_decode_error_wraps_transparently() {
        let err: DecisionError = DecodeError::new("INVALID_CODE", "bad grammar").into();
        assert_eq!(
            err.to_string(),
            "cannot decode solution code 'INVALID_CODE': bad grammar"
        );
    }
}
