//! Explanation records and their text rendering.

use crate::catalog::Metric;
use std::fmt;

/// How far the winner sits from the best Pareto-optimal value of a metric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricMargin {
    pub metric: Metric,
    pub winner_value: f64,
    /// Best raw value within the Pareto set, per the metric's orientation.
    pub best_value: f64,
    /// Pareto-optimal candidate holding `best_value` (lowest code on ties).
    pub best_code: String,
    /// `|winner − best| / |best| · 100`. `None` when `best` is zero and the
    /// winner differs from it.
    pub gap_pct: Option<f64>,
}

impl MetricMargin {
    /// Whether the winner itself holds the best value.
    pub fn winner_is_best(&self) -> bool {
        self.winner_value == self.best_value
    }
}

/// Raw difference between the winner and the runner-up on one metric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricDelta {
    pub metric: Metric,
    pub winner: f64,
    pub runner_up: f64,
}

impl MetricDelta {
    /// `winner − runner_up`.
    pub fn delta(&self) -> f64 {
        self.winner - self.runner_up
    }
}

impl fmt::Display for MetricDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delta = self.delta();
        let sign = if delta < 0.0 { "-" } else { "+" };
        let magnitude = delta.abs();
        match self.metric.unit() {
            "$" => write!(f, "{sign}${magnitude:.0} {}", self.metric),
            "" => write!(f, "{sign}{magnitude:.2} {}", self.metric),
            unit => write!(f, "{sign}{magnitude:.1} {unit}"),
        }
    }
}

/// Facts comparing the winner with the second-ranked candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeOff {
    pub runner_up: String,
    /// Non-zero deltas on cost, duration, CO2 and manhours.
    pub deltas: Vec<MetricDelta>,
    /// Code-level differences (join type, length granularity, grouping).
    /// Empty when either code cannot be decoded.
    pub implications: Vec<String>,
}

impl TradeOff {
    /// Whether no difference was found at all.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty() && self.implications.is_empty()
    }
}

impl fmt::Display for TradeOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "vs {}: no significant differences", self.runner_up);
        }
        if !self.deltas.is_empty() {
            let parts: Vec<String> = self.deltas.iter().map(ToString::to_string).collect();
            write!(f, "vs {}: {}", self.runner_up, parts.join("; "))?;
        } else {
            write!(f, "vs {}", self.runner_up)?;
        }
        if !self.implications.is_empty() {
            write!(f, ". Implications: {}", self.implications.join("; "))?;
        }
        Ok(())
    }
}

/// Human-readable account of a selection outcome.
///
/// Restates facts already computed by the pipeline; nothing here feeds back
/// into ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Explanation {
    /// Preset name, or `custom` for explicit weights.
    pub objective: String,
    pub objective_description: String,
    pub winner: String,
    /// Raw metrics of the winner in canonical order.
    pub winner_metrics: Vec<(Metric, f64)>,
    /// Decoded code breakdown; `None` for undecodable codes.
    pub breakdown: Option<Vec<String>>,
    pub total_candidates: usize,
    pub feasible_candidates: usize,
    pub pareto_optimal: usize,
    /// Pareto-optimal codes in code order.
    pub pareto_codes: Vec<String>,
    pub margins: Vec<MetricMargin>,
    pub trade_off: Option<TradeOff>,
}

fn fmt_raw(metric: Metric, value: f64) -> String {
    match metric.unit() {
        "$" => format!("${value:.0}"),
        "" => format!("{value:.2}"),
        unit => format!("{value:.1} {unit}"),
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objective: {} ({})", self.objective, self.objective_description)?;
        writeln!(
            f,
            "Candidates: {} total, {} feasible, {} Pareto-optimal",
            self.total_candidates, self.feasible_candidates, self.pareto_optimal
        )?;
        if !self.pareto_codes.is_empty() {
            writeln!(f, "Pareto set: {}", self.pareto_codes.join(", "))?;
        }

        writeln!(f, "Recommended: {}", self.winner)?;
        for (metric, value) in &self.winner_metrics {
            writeln!(f, "  {metric}: {}", fmt_raw(*metric, *value))?;
        }

        if let Some(lines) = &self.breakdown {
            writeln!(f, "Code breakdown:")?;
            for line in lines {
                writeln!(f, "  - {line}")?;
            }
        }

        if !self.margins.is_empty() {
            writeln!(f, "Margins within the Pareto set:")?;
            for m in &self.margins {
                if m.winner_is_best() {
                    writeln!(f, "  {}: best ({})", m.metric, fmt_raw(m.metric, m.winner_value))?;
                } else {
                    match m.gap_pct {
                        Some(gap) => writeln!(
                            f,
                            "  {}: {:.1}% off best {} ({})",
                            m.metric,
                            gap,
                            fmt_raw(m.metric, m.best_value),
                            m.best_code
                        )?,
                        None => writeln!(
                            f,
                            "  {}: {} vs best {} ({})",
                            m.metric,
                            fmt_raw(m.metric, m.winner_value),
                            fmt_raw(m.metric, m.best_value),
                            m.best_code
                        )?,
                    }
                }
            }
        }

        if let Some(trade_off) = &self.trade_off {
            writeln!(f, "Trade-off: {trade_off}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_rendering() {
        let cost = MetricDelta {
            metric: Metric::SteelCost,
            winner: 135_000.0,
            runner_up: 138_000.0,
        };
        assert_eq!(cost.to_string(), "-$3000 steel_cost");

        let days = MetricDelta {
            metric: Metric::DurationDays,
            winner: 64.0,
            runner_up: 63.0,
        };
        assert_eq!(days.to_string(), "+1.0 days");
    }

    #[test]
    fn test_empty_trade_off() {
        let t = TradeOff {
            runner_up: "TR_6_L10".into(),
            deltas: vec![],
            implications: vec![],
        };
        assert!(t.is_empty());
        assert_eq!(t.to_string(), "vs TR_6_L10: no significant differences");
    }

    #[test]
    fn test_trade_off_with_implications() {
        let t = TradeOff {
            runner_up: "TR_6_L10".into(),
            deltas: vec![MetricDelta {
                metric: Metric::Co2Tonnes,
                winner: 498.0,
                runner_up: 505.0,
            }],
            implications: vec!["EM reduces congestion vs TR".into()],
        };
        assert_eq!(
            t.to_string(),
            "vs TR_6_L10: -7.0 tCO2. Implications: EM reduces congestion vs TR"
        );
    }
}
