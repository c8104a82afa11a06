//! Feasibility partitioning.

use super::types::{Constraint, MnemonicPredicate, Observed, Operator, Violation};
use crate::catalog::{Candidate, Catalog, Metric};
use crate::decoder::{decode, SolutionCode};
use crate::error::{DecodeError, Result};
use tracing::{debug, warn};

/// Outcome of filtering a catalog against a constraint list.
///
/// Every catalog candidate lands in exactly one of the three lists.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterOutcome {
    /// Codes satisfying every constraint, in code order.
    pub feasible: Vec<String>,
    /// Candidates failing at least one constraint, in code order.
    pub rejected: Vec<Rejection>,
    /// Candidates whose code could not be decoded for a mnemonic predicate.
    pub skipped: Vec<SkippedCandidate>,
}

impl FilterOutcome {
    /// Whether no candidate is feasible.
    pub fn is_empty(&self) -> bool {
        self.feasible.is_empty()
    }

    /// Whether `code` passed every constraint.
    pub fn is_feasible(&self, code: &str) -> bool {
        self.feasible.iter().any(|c| c == code)
    }

    /// Total number of candidates that were examined.
    pub fn total(&self) -> usize {
        self.feasible.len() + self.rejected.len() + self.skipped.len()
    }

    /// The feasible candidates as a new catalog.
    pub fn feasible_catalog(&self, catalog: &Catalog) -> Catalog {
        catalog.subset(&self.feasible)
    }
}

/// A candidate that failed one or more constraints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rejection {
    pub code: String,
    /// Every constraint the candidate failed, in constraint-list order.
    pub violated_constraints: Vec<Violation>,
}

/// A candidate left out of a filter pass because its code is malformed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedCandidate {
    pub code: String,
    pub reason: String,
}

impl From<DecodeError> for SkippedCandidate {
    fn from(err: DecodeError) -> Self {
        Self {
            reason: err.reason,
            code: err.code,
        }
    }
}

/// A constraint with its metric name resolved.
#[derive(Debug, Clone)]
enum Resolved<'a> {
    Metric {
        source: &'a Constraint,
        metric: Metric,
        operator: Operator,
        value: f64,
    },
    Mnemonic {
        source: &'a Constraint,
        predicate: &'a MnemonicPredicate,
    },
}

/// Checks that every metric constraint names a known metric.
///
/// # Errors
///
/// [`DecisionError::UnknownMetric`](crate::error::DecisionError::UnknownMetric)
/// for the first unknown name in list order.
pub fn validate(constraints: &[Constraint]) -> Result<()> {
    resolve(constraints).map(|_| ())
}

fn resolve(constraints: &[Constraint]) -> Result<Vec<Resolved<'_>>> {
    constraints
        .iter()
        .map(|c| match c {
            Constraint::Metric {
                parameter,
                operator,
                value,
            } => Ok(Resolved::Metric {
                source: c,
                metric: Metric::lookup(parameter)?,
                operator: *operator,
                value: *value,
            }),
            Constraint::Mnemonic(predicate) => Ok(Resolved::Mnemonic {
                source: c,
                predicate,
            }),
        })
        .collect()
}

/// Partitions a catalog into feasible, rejected and skipped candidates.
///
/// Constraints combine with logical AND. All metric names are resolved
/// before any candidate is examined. Codes are decoded only when a mnemonic
/// predicate is present; a candidate whose code fails to decode is skipped
/// with a warning and the pass continues.
///
/// # Errors
///
/// [`DecisionError::UnknownMetric`](crate::error::DecisionError::UnknownMetric)
/// if any metric constraint names an undefined metric.
pub fn apply(catalog: &Catalog, constraints: &[Constraint]) -> Result<FilterOutcome> {
    let resolved = resolve(constraints)?;
    let needs_decode = constraints.iter().any(Constraint::needs_decode);

    let mut outcome = FilterOutcome::default();
    for candidate in catalog {
        let decoded = if needs_decode {
            match decode(candidate.code()) {
                Ok(code) => Some(code),
                Err(err) => {
                    warn!(code = %err.code, reason = %err.reason, "skipping undecodable candidate");
                    outcome.skipped.push(err.into());
                    continue;
                }
            }
        } else {
            None
        };

        let violations = evaluate(candidate, decoded.as_ref(), &resolved);
        if violations.is_empty() {
            outcome.feasible.push(candidate.code().to_string());
        } else {
            outcome.rejected.push(Rejection {
                code: candidate.code().to_string(),
                violated_constraints: violations,
            });
        }
    }

    debug!(
        constraints = constraints.len(),
        feasible = outcome.feasible.len(),
        rejected = outcome.rejected.len(),
        skipped = outcome.skipped.len(),
        "constraint filter applied"
    );
    Ok(outcome)
}

fn evaluate(
    candidate: &Candidate,
    decoded: Option<&SolutionCode>,
    constraints: &[Resolved<'_>],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for constraint in constraints {
        match constraint {
            Resolved::Metric {
                source,
                metric,
                operator,
                value,
            } => {
                let actual = candidate.value(*metric);
                if !operator.holds(actual, *value) {
                    violations.push(Violation {
                        constraint: (*source).clone(),
                        observed: Observed::Value {
                            metric: *metric,
                            value: actual,
                        },
                    });
                }
            }
            Resolved::Mnemonic { source, predicate } => {
                // `decoded` is always present when a mnemonic predicate exists.
                if let Some(code) = decoded {
                    if !predicate.matches(code) {
                        violations.push(Violation {
                            constraint: (*source).clone(),
                            observed: Observed::Code(*code),
                        });
                    }
                }
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{record, sample_catalog};
    use crate::decoder::JoinType;
    use crate::error::DecisionError;

    fn feasible_set(outcome: &FilterOutcome) -> Vec<&str> {
        outcome.feasible.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_no_constraints_all_feasible() {
        let outcome = apply(&sample_catalog(), &[]).unwrap();
        assert_eq!(outcome.feasible.len(), 3);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_join_constraint() {
        let c = Constraint::mnemonic(MnemonicPredicate::JoinIn(vec![JoinType::Em]));
        let outcome = apply(&sample_catalog(), &[c]).unwrap();
        assert_eq!(feasible_set(&outcome), vec!["AG_EM_5a8_L50", "EM_6a6_L100"]);
        assert_eq!(outcome.rejected[0].code, "TR_6_L10");
    }

    #[test]
    fn test_grouped_and_length_constraints() {
        let catalog = sample_catalog();
        let outcome = apply(&catalog, &[Constraint::parse("grouped = true").unwrap()]).unwrap();
        assert_eq!(feasible_set(&outcome), vec!["AG_EM_5a8_L50"]);

        let outcome = apply(&catalog, &[Constraint::parse("length in 10,50").unwrap()]).unwrap();
        assert_eq!(feasible_set(&outcome), vec!["AG_EM_5a8_L50", "TR_6_L10"]);
    }

    #[test]
    fn test_bar_constraints() {
        let catalog = sample_catalog();
        let outcome = apply(&catalog, &[Constraint::parse("bars = 5-8").unwrap()]).unwrap();
        assert_eq!(feasible_set(&outcome), vec!["AG_EM_5a8_L50"]);

        let outcome = apply(&catalog, &[Constraint::parse("bars = 6").unwrap()]).unwrap();
        assert_eq!(outcome.feasible.len(), 3);
    }

    #[test]
    fn test_metric_constraints_and_logic() {
        let catalog = sample_catalog();
        let outcome = apply(
            &catalog,
            &[Constraint::metric("steel_cost", Operator::Le, 140000.0)],
        )
        .unwrap();
        assert_eq!(feasible_set(&outcome), vec!["EM_6a6_L100", "TR_6_L10"]);

        let outcome = apply(
            &catalog,
            &[
                Constraint::metric("steel_cost", Operator::Le, 140000.0),
                Constraint::metric("co2_tonnes", Operator::Lt, 500.0),
            ],
        )
        .unwrap();
        assert_eq!(feasible_set(&outcome), vec!["EM_6a6_L100"]);
    }

    #[test]
    fn test_rejection_lists_every_violation() {
        let outcome = apply(
            &sample_catalog(),
            &[
                Constraint::metric("steel_cost", Operator::Le, 140000.0),
                Constraint::metric("duration", Operator::Lt, 65.0),
                Constraint::parse("join in TR").unwrap(),
            ],
        )
        .unwrap();
        let ag = outcome
            .rejected
            .iter()
            .find(|r| r.code == "AG_EM_5a8_L50")
            .unwrap();
        assert_eq!(ag.violated_constraints.len(), 3);
        assert_eq!(
            ag.violated_constraints[0].to_string(),
            "steel_cost 147750 > 140000"
        );
        assert_eq!(
            ag.violated_constraints[1].to_string(),
            "duration_days 68 >= 65"
        );
        assert_eq!(outcome.total(), 3);
    }

    #[test]
    fn test_total_cost_alias() {
        let outcome = apply(
            &sample_catalog(),
            &[Constraint::parse("cost <= 450000").unwrap()],
        )
        .unwrap();
        assert_eq!(feasible_set(&outcome), vec!["EM_6a6_L100", "TR_6_L10"]);
    }

    #[test]
    fn test_unknown_metric_fails_before_filtering() {
        let err = apply(
            &sample_catalog(),
            &[
                Constraint::metric("steel_cost", Operator::Le, 1.0),
                Constraint::metric("turbo_factor", Operator::Gt, 1.0),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DecisionError::UnknownMetric {
                name: "turbo_factor".into()
            }
        );
        assert!(validate(&[Constraint::metric("turbo_factor", Operator::Gt, 1.0)]).is_err());
    }

    #[test]
    fn test_undecodable_candidate_skipped_not_fatal() {
        let catalog = Catalog::from_records([
            ("TR_6_L10", record([1.0; 9])),
            ("INVALID_CODE", record([1.0; 9])),
        ])
        .unwrap();

        let outcome = apply(&catalog, &[Constraint::parse("join in TR").unwrap()]).unwrap();
        assert_eq!(feasible_set(&outcome), vec!["TR_6_L10"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].code, "INVALID_CODE");

        // Without mnemonic predicates the code is never decoded.
        let outcome = apply(&catalog, &[Constraint::metric("manhours", Operator::Ge, 0.0)]).unwrap();
        assert_eq!(outcome.feasible.len(), 2);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_zero_feasible_is_a_result() {
        let catalog = sample_catalog();
        let outcome = apply(
            &catalog,
            &[Constraint::metric("steel_cost", Operator::Le, 50000.0)],
        )
        .unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.rejected.len(), 3);
        assert!(outcome.feasible_catalog(&catalog).is_empty());
    }
}
