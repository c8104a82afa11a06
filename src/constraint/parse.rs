//! Boundary adapter: constraint strings to structured constraints.
//!
//! Accepted forms:
//!
//! ```text
//! <metric> <op> <number>      op ∈ <=, <, >=, >, ==, !=, = (alias of ==)
//! join in EM,TR | join = EM
//! grouped = true|false
//! bars = 5-8                  exact range
//! bars = 6                    range contains size
//! length in 10,50 | length = 50
//! ```
//!
//! Metric names are lowercased but not resolved here; the filter resolves
//! them so that parsed and hand-built constraints fail the same way.

use super::types::{Constraint, MnemonicPredicate, Operator};
use crate::decoder::JoinType;
use crate::error::{DecisionError, Result};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// Comma-grouped numbers: commas only between complete thousands groups.
static GROUPED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\$?[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?$")
        .expect("grouped number pattern is a valid regex")
});

/// Symbols in match priority order: two-character operators first.
const OPERATORS: [(&str, Operator); 7] = [
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("==", Operator::Eq),
    ("!=", Operator::Ne),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("=", Operator::Eq),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MnemonicKey {
    Join,
    Grouped,
    Bars,
    Length,
}

impl MnemonicKey {
    fn lookup(key: &str) -> Option<Self> {
        match key {
            "join" => Some(MnemonicKey::Join),
            "grouped" | "ag" => Some(MnemonicKey::Grouped),
            "bars" | "bar" => Some(MnemonicKey::Bars),
            "length" | "length_cm" | "l" => Some(MnemonicKey::Length),
            _ => None,
        }
    }
}

impl Constraint {
    /// Parses a boundary-level constraint string.
    ///
    /// # Errors
    ///
    /// [`DecisionError::InvalidConstraint`] when the string has no operator,
    /// a malformed value, or an operator the key does not support.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tradeoff::constraint::{Constraint, Operator};
    ///
    /// let c = Constraint::parse("cost <= 450000").unwrap();
    /// assert_eq!(c, Constraint::metric("cost", Operator::Le, 450000.0));
    /// ```
    pub fn parse(input: &str) -> Result<Constraint> {
        let text = input.trim();
        let lower = text.to_ascii_lowercase();

        if let Some(pos) = lower.find(" in ") {
            let key = lower[..pos].trim();
            let rhs = text[pos + 4..].trim();
            let Some(mnemonic) = MnemonicKey::lookup(key) else {
                return Err(invalid(input, "'in' is only supported for join, bars and length"));
            };
            return parse_mnemonic(input, mnemonic, rhs);
        }

        let (lhs, operator, rhs) =
            split_operator(text).ok_or_else(|| invalid(input, "no comparison operator"))?;
        let key = lhs.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(invalid(input, "missing parameter name"));
        }

        if let Some(mnemonic) = MnemonicKey::lookup(&key) {
            if operator != Operator::Eq {
                return Err(invalid(
                    input,
                    format!("'{key}' only supports '=' or 'in', got '{operator}'"),
                ));
            }
            return parse_mnemonic(input, mnemonic, rhs.trim());
        }

        let value = parse_number(rhs)
            .ok_or_else(|| invalid(input, format!("'{}' is not a number", rhs.trim())))?;
        Ok(Constraint::metric(key, operator, value))
    }
}

impl FromStr for Constraint {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self> {
        Constraint::parse(s)
    }
}

fn split_operator(text: &str) -> Option<(&str, Operator, &str)> {
    OPERATORS.iter().find_map(|&(symbol, op)| {
        text.find(symbol)
            .map(|pos| (&text[..pos], op, &text[pos + symbol.len()..]))
    })
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.contains(',') && !GROUPED_NUMBER.is_match(text) {
        return None;
    }
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '_' | ',' | '$'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_mnemonic(input: &str, key: MnemonicKey, rhs: &str) -> Result<Constraint> {
    let predicate = match key {
        MnemonicKey::Join => {
            let joins = rhs
                .split(',')
                .map(|part| part.parse::<JoinType>().map_err(|e| invalid(input, e)))
                .collect::<Result<Vec<_>>>()?;
            MnemonicPredicate::JoinIn(joins)
        }
        MnemonicKey::Grouped => match rhs.to_ascii_lowercase().as_str() {
            "true" | "yes" => MnemonicPredicate::Grouped(true),
            "false" | "no" => MnemonicPredicate::Grouped(false),
            other => return Err(invalid(input, format!("'{other}' is not a boolean"))),
        },
        MnemonicKey::Bars => match rhs.split_once('-') {
            Some((lo, hi)) => {
                let min = parse_size(input, lo)?;
                let max = parse_size(input, hi)?;
                if min > max {
                    return Err(invalid(input, format!("bar range {min}-{max} is reversed")));
                }
                MnemonicPredicate::BarRangeExact { min, max }
            }
            None => MnemonicPredicate::BarContains(parse_size(input, rhs)?),
        },
        MnemonicKey::Length => {
            let lengths = rhs
                .split(',')
                .map(|part| parse_size(input, part))
                .collect::<Result<Vec<_>>>()?;
            MnemonicPredicate::LengthIn(lengths)
        }
    };
    Ok(Constraint::Mnemonic(predicate))
}

fn parse_size(input: &str, text: &str) -> Result<u32> {
    let text = text.trim();
    let text = text.strip_prefix(['L', 'l', '#']).unwrap_or(text);
    text.parse::<u32>()
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| invalid(input, format!("'{text}' is not a positive integer")))
}

fn invalid(input: &str, reason: impl Into<String>) -> DecisionError {
    DecisionError::InvalidConstraint {
        input: input.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_operators() {
        let cases = [
            ("cost <= 450000", Operator::Le),
            ("cost < 450000", Operator::Lt),
            ("cost >= 450000", Operator::Ge),
            ("cost > 450000", Operator::Gt),
            ("cost == 450000", Operator::Eq),
            ("cost != 450000", Operator::Ne),
            ("cost = 450000", Operator::Eq),
        ];
        for (input, op) in cases {
            assert_eq!(
                Constraint::parse(input).unwrap(),
                Constraint::metric("cost", op, 450000.0),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parameter_lowercased_and_separators_stripped() {
        let c: Constraint = "Duration_Days<=70".parse().unwrap();
        assert_eq!(c, Constraint::metric("duration_days", Operator::Le, 70.0));

        let c = Constraint::parse("steel_cost <= $140,000").unwrap();
        assert_eq!(c, Constraint::metric("steel_cost", Operator::Le, 140000.0));
    }

    #[test]
    fn test_misplaced_commas_rejected() {
        for input in ["cost <= 1,5", "cost <= 1,50,000", "cost <= 1500,0", "cost <= ,500"] {
            assert!(
                matches!(
                    Constraint::parse(input),
                    Err(DecisionError::InvalidConstraint { .. })
                ),
                "{input}"
            );
        }
        let c = Constraint::parse("cost <= 1,500,000.5").unwrap();
        assert_eq!(c, Constraint::metric("cost", Operator::Le, 1_500_000.5));
    }

    #[test]
    fn test_unknown_metric_is_not_a_parse_error() {
        let c = Constraint::parse("turbo_factor > 1").unwrap();
        assert_eq!(c, Constraint::metric("turbo_factor", Operator::Gt, 1.0));
    }

    #[test]
    fn test_mnemonic_forms() {
        assert_eq!(
            Constraint::parse("join in EM, TR").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::JoinIn(vec![JoinType::Em, JoinType::Tr]))
        );
        assert_eq!(
            Constraint::parse("join = em").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::JoinIn(vec![JoinType::Em]))
        );
        assert_eq!(
            Constraint::parse("grouped = true").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::Grouped(true))
        );
        assert_eq!(
            Constraint::parse("bars = 5-8").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::BarRangeExact { min: 5, max: 8 })
        );
        assert_eq!(
            Constraint::parse("bars = 6").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::BarContains(6))
        );
        assert_eq!(
            Constraint::parse("length in 10,L50").unwrap(),
            Constraint::Mnemonic(MnemonicPredicate::LengthIn(vec![10, 50]))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for input in [
            "steel_cost <= 140000",
            "join in EM,TR",
            "grouped = false",
            "bars = 5-8",
            "bars = 6",
            "length in 10,50",
        ] {
            let c = Constraint::parse(input).unwrap();
            assert_eq!(Constraint::parse(&c.to_string()).unwrap(), c, "{input}");
        }
    }

    #[test]
    fn test_invalid_inputs() {
        for input in [
            "cost 450000",
            "cost <= lots",
            "<= 5",
            "join in XX",
            "grouped = maybe",
            "bars = 8-5",
            "bars = 0",
            "bars < 6",
            "length in ten",
            "steel_cost in 1,2",
        ] {
            let err = Constraint::parse(input).unwrap_err();
            assert!(
                matches!(err, DecisionError::InvalidConstraint { .. }),
                "{input}: {err:?}"
            );
        }
    }
}
