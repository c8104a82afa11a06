//! Builds explanations from already-computed selection results.

use super::types::{Explanation, MetricDelta, MetricMargin, TradeOff};
use crate::catalog::{Candidate, Catalog, Metric};
use crate::constraint::FilterOutcome;
use crate::decoder::{decode, JoinType, SolutionCode};
use crate::normalize::OrientationTable;
use crate::pareto::ParetoSet;
use crate::scoring::{OptimizationSpec, ScoreRecord};

/// Metrics compared between the winner and the runner-up.
const TRADE_OFF_METRICS: [Metric; 5] = [
    Metric::SteelCost,
    Metric::ConcreteCost,
    Metric::DurationDays,
    Metric::Co2Tonnes,
    Metric::Manhours,
];

/// Everything the generator reads. All of it is produced upstream.
#[derive(Debug, Clone, Copy)]
pub struct ExplainInput<'a> {
    /// Catalog holding raw values for every ranked code.
    pub catalog: &'a Catalog,
    pub ranking: &'a [ScoreRecord],
    pub pareto: &'a ParetoSet,
    pub filter: &'a FilterOutcome,
    pub spec: &'a OptimizationSpec,
    /// Metrics reported in the margin section, in display order.
    pub metrics: &'a [Metric],
    pub orientations: &'a OrientationTable,
}

/// Explains the top-ranked candidate.
///
/// Returns `None` when the ranking is empty (nothing feasible) or the winner
/// is missing from `catalog`.
pub fn explain(input: &ExplainInput<'_>) -> Option<Explanation> {
    let winner_record = input.ranking.first()?;
    let winner = input.catalog.get(&winner_record.code)?;

    let (objective, objective_description) = if input.spec.weights.is_empty() {
        let preset = input.spec.primary_objective;
        (preset.name().to_string(), preset.description().to_string())
    } else {
        (
            "custom".to_string(),
            "explicit weights supplied with the request".to_string(),
        )
    };

    let trade_off = input
        .ranking
        .get(1)
        .and_then(|second| input.catalog.get(&second.code))
        .map(|second| trade_off(winner, second));

    Some(Explanation {
        objective,
        objective_description,
        winner: winner.code().to_string(),
        winner_metrics: winner.metrics().collect(),
        breakdown: decode(winner.code()).ok().map(|c| c.describe()),
        total_candidates: input.filter.total(),
        feasible_candidates: input.filter.feasible.len(),
        pareto_optimal: input.pareto.len(),
        pareto_codes: input.pareto.iter().cloned().collect(),
        margins: margins(winner, input),
        trade_off,
    })
}

fn margins(winner: &Candidate, input: &ExplainInput<'_>) -> Vec<MetricMargin> {
    let pareto: Vec<&Candidate> = input
        .pareto
        .iter()
        .filter_map(|code| input.catalog.get(code))
        .collect();

    input
        .metrics
        .iter()
        .filter_map(|&metric| {
            let orientation = input.orientations.get(metric);
            let best = pareto.iter().copied().fold(None, |best: Option<&Candidate>, c| {
                match best {
                    Some(b) if !orientation.is_better(c.value(metric), b.value(metric)) => Some(b),
                    _ => Some(c),
                }
            })?;

            let winner_value = winner.value(metric);
            let best_value = best.value(metric);
            let gap_pct = if best_value != 0.0 {
                Some((winner_value - best_value).abs() / best_value.abs() * 100.0)
            } else if winner_value == best_value {
                Some(0.0)
            } else {
                None
            };

            Some(MetricMargin {
                metric,
                winner_value,
                best_value,
                best_code: best.code().to_string(),
                gap_pct,
            })
        })
        .collect()
}

/// Raw deltas and code-level implications between two candidates.
pub fn trade_off(winner: &Candidate, runner_up: &Candidate) -> TradeOff {
    let deltas = TRADE_OFF_METRICS
        .iter()
        .map(|&metric| MetricDelta {
            metric,
            winner: winner.value(metric),
            runner_up: runner_up.value(metric),
        })
        .filter(|d| d.delta() != 0.0)
        .collect();

    let implications = match (decode(winner.code()), decode(runner_up.code())) {
        (Ok(a), Ok(b)) => implications(&a, &b),
        _ => Vec::new(),
    };

    TradeOff {
        runner_up: runner_up.code().to_string(),
        deltas,
        implications,
    }
}

fn implications(winner: &SolutionCode, other: &SolutionCode) -> Vec<String> {
    let mut lines = Vec::new();

    if winner.join != other.join {
        lines.push(match winner.join {
            JoinType::Em => "EM reduces congestion vs TR".to_string(),
            JoinType::Tr => "TR reduces cost vs EM".to_string(),
        });
    }

    if winner.length_cm > other.length_cm {
        lines.push(format!(
            "L{} reduces SKU fragmentation vs L{}",
            winner.length_cm, other.length_cm
        ));
    } else if winner.length_cm < other.length_cm {
        lines.push(format!(
            "L{} increases cutting flexibility vs L{}",
            winner.length_cm, other.length_cm
        ));
    }

    if winner.grouped != other.grouped {
        lines.push(if winner.grouped {
            "AG_ stabilizes procurement lots".to_string()
        } else {
            "non-grouped allows order flexibility".to_string()
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;
    use crate::constraint::apply;
    use crate::scoring::ObjectivePreset;

    fn ranking(codes: &[&str]) -> Vec<ScoreRecord> {
        codes
            .iter()
            .enumerate()
            .map(|(i, c)| ScoreRecord {
                code: c.to_string(),
                score: i as f64 * 0.1,
                rank: i + 1,
            })
            .collect()
    }

    #[test]
    fn test_explains_winner() {
        let catalog = sample_catalog();
        let filter = apply(&catalog, &[]).unwrap();
        let pareto: ParetoSet = ["EM_6a6_L100".to_string()].into_iter().collect();
        let spec = OptimizationSpec::new(ObjectivePreset::MinCost);
        let ranking = ranking(&["EM_6a6_L100", "TR_6_L10", "AG_EM_5a8_L50"]);
        let metrics = [Metric::SteelCost, Metric::DurationDays];
        let orientations = OrientationTable::default();

        let explanation = explain(&ExplainInput {
            catalog: &catalog,
            ranking: &ranking,
            pareto: &pareto,
            filter: &filter,
            spec: &spec,
            metrics: &metrics,
            orientations: &orientations,
        })
        .unwrap();

        assert_eq!(explanation.objective, "min_cost");
        assert_eq!(explanation.winner, "EM_6a6_L100");
        assert_eq!(explanation.total_candidates, 3);
        assert_eq!(explanation.feasible_candidates, 3);
        assert_eq!(explanation.pareto_optimal, 1);
        assert_eq!(explanation.breakdown.as_ref().map(Vec::len), Some(4));
        assert!(explanation.margins.iter().all(MetricMargin::winner_is_best));

        let trade_off = explanation.trade_off.as_ref().unwrap();
        assert_eq!(trade_off.runner_up, "TR_6_L10");
        let steel = trade_off
            .deltas
            .iter()
            .find(|d| d.metric == Metric::SteelCost)
            .unwrap();
        assert_eq!(steel.delta(), -3000.0);
        assert!(trade_off
            .implications
            .contains(&"EM reduces congestion vs TR".to_string()));
        assert!(trade_off
            .implications
            .contains(&"L100 reduces SKU fragmentation vs L10".to_string()));

        let text = explanation.to_string();
        assert!(text.contains("Recommended: EM_6a6_L100"));
        assert!(text.contains("3 total, 3 feasible, 1 Pareto-optimal"));
    }

    #[test]
    fn test_margin_gap_against_pareto_best() {
        let catalog = sample_catalog();
        let filter = apply(&catalog, &[]).unwrap();
        let pareto: ParetoSet = ["AG_EM_5a8_L50", "EM_6a6_L100"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let spec = OptimizationSpec::new(ObjectivePreset::HighConstructibility);
        let ranking = ranking(&["EM_6a6_L100"]);
        let metrics = [Metric::ConstructibilityIndex];
        let orientations = OrientationTable::default();

        let explanation = explain(&ExplainInput {
            catalog: &catalog,
            ranking: &ranking,
            pareto: &pareto,
            filter: &filter,
            spec: &spec,
            metrics: &metrics,
            orientations: &orientations,
        })
        .unwrap();

        let margin = &explanation.margins[0];
        assert_eq!(margin.best_code, "AG_EM_5a8_L50");
        assert_eq!(margin.best_value, 2.7);
        let gap = margin.gap_pct.unwrap();
        assert!((gap - (0.3 / 2.7 * 100.0)).abs() < 1e-9);
        assert!(explanation.trade_off.is_none());
    }

    #[test]
    fn test_empty_ranking_has_no_explanation() {
        let catalog = sample_catalog();
        let filter = FilterOutcome::default();
        let pareto = ParetoSet::new();
        let spec = OptimizationSpec::new(ObjectivePreset::Balanced);
        let orientations = OrientationTable::default();
        let input = ExplainInput {
            catalog: &catalog,
            ranking: &[],
            pareto: &pareto,
            filter: &filter,
            spec: &spec,
            metrics: &[],
            orientations: &orientations,
        };
        assert!(explain(&input).is_none());
    }

    #[test]
    fn test_undecodable_codes_skip_implications() {
        let catalog = crate::catalog::Catalog::from_records([
            ("OPTION_A", crate::catalog::record([1.0; 9])),
            ("OPTION_B", crate::catalog::record([2.0; 9])),
        ])
        .unwrap();
        let a = catalog.get("OPTION_A").unwrap();
        let b = catalog.get("OPTION_B").unwrap();
        let t = trade_off(a, b);
        assert!(t.implications.is_empty());
        assert_eq!(t.deltas.len(), TRADE_OFF_METRICS.len());
    }
}
