//! Constraint definitions.

use crate::catalog::Metric;
use crate::decoder::{JoinType, SolutionCode};
use std::fmt;

/// Absolute tolerance for `==` / `!=` comparisons on raw metric values.
pub const EQUALITY_TOLERANCE: f64 = 1e-6;

/// Comparison operator of a numeric constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Lt,
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Gt,
    #[cfg_attr(feature = "serde", serde(rename = "=="))]
    Eq,
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    Ne,
}

impl Operator {
    /// Symbol as written in constraint strings.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }

    /// The operator that holds exactly when `self` fails.
    pub fn negate(self) -> Operator {
        match self {
            Operator::Le => Operator::Gt,
            Operator::Lt => Operator::Ge,
            Operator::Ge => Operator::Lt,
            Operator::Gt => Operator::Le,
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
        }
    }

    /// Evaluates `lhs <op> rhs`.
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Le => lhs <= rhs,
            Operator::Lt => lhs < rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Eq => (lhs - rhs).abs() < EQUALITY_TOLERANCE,
            Operator::Ne => (lhs - rhs).abs() >= EQUALITY_TOLERANCE,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A predicate over the decoded solution code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MnemonicPredicate {
    /// Join type must be one of these.
    JoinIn(Vec<JoinType>),
    /// Grouped flag must equal this.
    Grouped(bool),
    /// Bar range must contain this size.
    BarContains(u32),
    /// Bar range must be exactly `min..=max`.
    BarRangeExact { min: u32, max: u32 },
    /// Length granularity must be one of these.
    LengthIn(Vec<u32>),
}

impl MnemonicPredicate {
    /// Whether the decoded code satisfies this predicate.
    pub fn matches(&self, code: &SolutionCode) -> bool {
        match self {
            MnemonicPredicate::JoinIn(joins) => joins.contains(&code.join),
            MnemonicPredicate::Grouped(grouped) => code.grouped == *grouped,
            MnemonicPredicate::BarContains(bar) => code.contains_bar(*bar),
            MnemonicPredicate::BarRangeExact { min, max } => {
                code.bar_min == *min && code.bar_max == *max
            }
            MnemonicPredicate::LengthIn(lengths) => lengths.contains(&code.length_cm),
        }
    }
}

impl fmt::Display for MnemonicPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MnemonicPredicate::JoinIn(joins) => {
                let names: Vec<&str> = joins.iter().map(|j| j.mnemonic()).collect();
                write!(f, "join in {}", names.join(","))
            }
            MnemonicPredicate::Grouped(grouped) => write!(f, "grouped = {grouped}"),
            MnemonicPredicate::BarContains(bar) => write!(f, "bars = {bar}"),
            MnemonicPredicate::BarRangeExact { min, max } => write!(f, "bars = {min}-{max}"),
            MnemonicPredicate::LengthIn(lengths) => {
                let names: Vec<String> = lengths.iter().map(u32::to_string).collect();
                write!(f, "length in {}", names.join(","))
            }
        }
    }
}

/// A hard pass/fail rule a candidate must satisfy to be feasible.
///
/// Metric constraints keep the metric name as supplied so that an unknown
/// name can be reported verbatim when the constraint list is checked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    /// `{parameter, operator, value}` over a raw catalog field.
    Metric {
        parameter: String,
        operator: Operator,
        value: f64,
    },
    /// A predicate over the decoded solution code.
    Mnemonic(MnemonicPredicate),
}

impl Constraint {
    /// Numeric constraint on a named field.
    pub fn metric(parameter: impl Into<String>, operator: Operator, value: f64) -> Self {
        Constraint::Metric {
            parameter: parameter.into(),
            operator,
            value,
        }
    }

    /// Mnemonic constraint.
    pub fn mnemonic(predicate: MnemonicPredicate) -> Self {
        Constraint::Mnemonic(predicate)
    }

    /// Whether evaluating this constraint requires decoding the code.
    pub fn needs_decode(&self) -> bool {
        matches!(self, Constraint::Mnemonic(_))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Metric {
                parameter,
                operator,
                value,
            } => write!(f, "{parameter} {operator} {value}"),
            Constraint::Mnemonic(predicate) => write!(f, "{predicate}"),
        }
    }
}

/// What a candidate actually had when it failed a constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Observed {
    /// Raw value of the constrained metric.
    Value { metric: Metric, value: f64 },
    /// The decoded code that failed a mnemonic predicate.
    Code(SolutionCode),
}

/// One failed constraint for one candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    /// The constraint that failed.
    pub constraint: Constraint,
    /// What the candidate had instead.
    pub observed: Observed,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.constraint, &self.observed) {
            (
                Constraint::Metric {
                    operator, value, ..
                },
                Observed::Value { metric, value: actual },
            ) => write!(f, "{metric} {actual} {} {value}", operator.negate()),
            (constraint, Observed::Code(code)) => {
                write!(f, "{code} fails '{constraint}'")
            }
            (constraint, Observed::Value { metric, value }) => {
                write!(f, "{metric} {value} fails '{constraint}'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn test_operator_holds() {
        assert!(Operator::Le.holds(1.0, 1.0));
        assert!(!Operator::Lt.holds(1.0, 1.0));
        assert!(Operator::Ge.holds(2.0, 1.0));
        assert!(!Operator::Gt.holds(1.0, 1.0));
        assert!(Operator::Eq.holds(1.0, 1.0 + 1e-9));
        assert!(!Operator::Ne.holds(1.0, 1.0 + 1e-9));
        assert!(Operator::Ne.holds(1.0, 2.0));
    }

    #[test]
    fn test_negate_is_complement() {
        let ops = [
            Operator::Le,
            Operator::Lt,
            Operator::Ge,
            Operator::Gt,
            Operator::Eq,
            Operator::Ne,
        ];
        for op in ops {
            for (a, b) in [(1.0, 2.0), (2.0, 2.0), (3.0, 2.0)] {
                assert_ne!(op.holds(a, b), op.negate().holds(a, b), "{op} on {a},{b}");
            }
        }
    }

    #[test]
    fn test_mnemonic_matches() {
        let code = decode("AG_EM_5a8_L50").unwrap();
        assert!(MnemonicPredicate::JoinIn(vec![JoinType::Em]).matches(&code));
        assert!(!MnemonicPredicate::JoinIn(vec![JoinType::Tr]).matches(&code));
        assert!(MnemonicPredicate::Grouped(true).matches(&code));
        assert!(MnemonicPredicate::BarContains(6).matches(&code));
        assert!(MnemonicPredicate::BarRangeExact { min: 5, max: 8 }.matches(&code));
        assert!(!MnemonicPredicate::BarRangeExact { min: 5, max: 7 }.matches(&code));
        assert!(MnemonicPredicate::LengthIn(vec![10, 50]).matches(&code));
        assert!(!MnemonicPredicate::LengthIn(vec![100]).matches(&code));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation {
            constraint: Constraint::metric("steel_cost", Operator::Le, 140000.0),
            observed: Observed::Value {
                metric: Metric::SteelCost,
                value: 147750.0,
            },
        };
        assert_eq!(v.to_string(), "steel_cost 147750 > 140000");

        let v = Violation {
            constraint: Constraint::mnemonic(MnemonicPredicate::Grouped(true)),
            observed: Observed::Code(decode("TR_6_L10").unwrap()),
        };
        assert_eq!(v.to_string(), "TR_6_L10 fails 'grouped = true'");
    }
}
