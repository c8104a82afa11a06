//! End-to-end selection: filter, normalize, score, Pareto, explain.

use super::config::SelectionConfig;
use crate::catalog::{Catalog, Metric};
use crate::constraint::{self, FilterOutcome};
use crate::error::Result;
use crate::explain::{self, ExplainInput, Explanation};
use crate::normalize::normalize;
use crate::pareto::{pareto_front, ParetoSet};
use crate::scoring::{score_weighted_sum, OptimizationSpec, ScoreRecord, WeightMap};
use std::collections::BTreeMap;
use tracing::info;

/// Ranks of the alternatives reported next to the recommendation.
const ALTERNATIVE_RANKS: std::ops::RangeInclusive<usize> = 2..=4;

/// Outcome of one selection run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionResult {
    /// Every feasible candidate, best first.
    pub ranking: Vec<ScoreRecord>,
    /// Feasible/rejected/skipped partition of the input catalog.
    pub filter: FilterOutcome,
    /// Non-dominated feasible candidates.
    pub pareto: ParetoSet,
    /// Metrics the Pareto front was computed over.
    pub pareto_metrics: Vec<Metric>,
    /// Rank-1 code, if anything is feasible.
    pub recommended: Option<String>,
    /// The first `top_k` ranking entries.
    pub top_k: Vec<ScoreRecord>,
    /// Ranks 2 through 4.
    pub alternatives: Vec<ScoreRecord>,
    /// Weights actually used.
    pub weights: WeightMap,
    pub explanation: Option<Explanation>,
}

impl SelectionResult {
    /// Whether no candidate was feasible.
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Rank of a feasible candidate.
    pub fn rank_of(&self, code: &str) -> Option<usize> {
        self.ranking.iter().find(|r| r.code == code).map(|r| r.rank)
    }

    /// Code → rank for every ranked candidate.
    pub fn rank_map(&self) -> BTreeMap<String, usize> {
        self.ranking
            .iter()
            .map(|r| (r.code.clone(), r.rank))
            .collect()
    }
}

/// Runs the full selection pipeline on `catalog`.
///
/// 1. Filter by the spec's constraints
/// 2. Normalize the weighted (and Pareto) metrics over the feasible subset
/// 3. Score and rank with the weighted sum
/// 4. Compute the Pareto front of the feasible subset
/// 5. Explain the winner, when enabled
///
/// Zero feasible candidates is a valid outcome: the ranking is empty, no
/// recommendation is made and `filter` carries every rejection.
///
/// # Errors
///
/// Spec or config validation failures, and unknown constraint metrics.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// use u_tradeoff::catalog::{Catalog, Metric};
/// use u_tradeoff::constraint::Constraint;
/// use u_tradeoff::scoring::{ObjectivePreset, OptimizationSpec};
/// use u_tradeoff::selection::{select, SelectionConfig};
///
/// let rec = |cost: f64, days: f64| -> BTreeMap<String, f64> {
///     Metric::REQUIRED
///         .iter()
///         .map(|m| {
///             let v = match m {
///                 Metric::SteelCost => cost,
///                 Metric::DurationDays => days,
///                 _ => 1.0,
///             };
///             (m.name().to_string(), v)
///         })
///         .collect()
/// };
/// let catalog = Catalog::from_records([
///     ("EM_6_L10", rec(100.0, 70.0)),
///     ("TR_6_L10", rec(90.0, 75.0)),
///     ("TR_6_L50", rec(95.0, 90.0)),
/// ])
/// .unwrap();
///
/// let spec = OptimizationSpec::new(ObjectivePreset::Fastest)
///     .with_constraint(Constraint::parse("duration_days < 80").unwrap());
/// let result = select(&catalog, &spec, &SelectionConfig::default()).unwrap();
///
/// assert_eq!(result.recommended.as_deref(), Some("EM_6_L10"));
/// assert_eq!(result.filter.rejected[0].code, "TR_6_L50");
/// assert!(result.pareto.contains("TR_6_L10"));
/// ```
pub fn select(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    config: &SelectionConfig,
) -> Result<SelectionResult> {
    spec.validate()?;
    config.validate()?;

    let weights = spec.effective_weights();
    let pareto_metrics = config
        .pareto_metrics
        .clone()
        .unwrap_or_else(|| weights.active_metrics());

    let filter = constraint::apply(catalog, &spec.constraints)?;
    let feasible = filter.feasible_catalog(catalog);

    let mut metrics = weights.active_metrics();
    metrics.extend(pareto_metrics.iter().copied());
    let normalized = normalize(&feasible, &metrics, &config.orientations);

    let ranking = score_weighted_sum(&normalized, &weights);
    let pareto = pareto_front(&normalized, &pareto_metrics);

    let recommended = ranking.first().map(|r| r.code.clone());
    let top_k: Vec<ScoreRecord> = ranking.iter().take(config.top_k).cloned().collect();
    let alternatives: Vec<ScoreRecord> = ranking
        .iter()
        .filter(|r| ALTERNATIVE_RANKS.contains(&r.rank))
        .cloned()
        .collect();

    let explanation = if config.explain {
        explain::explain(&ExplainInput {
            catalog: &feasible,
            ranking: &ranking,
            pareto: &pareto,
            filter: &filter,
            spec,
            metrics: normalized.metrics(),
            orientations: &config.orientations,
        })
    } else {
        None
    };

    info!(
        objective = %spec.primary_objective,
        candidates = catalog.len(),
        feasible = filter.feasible.len(),
        pareto = pareto.len(),
        recommended = recommended.as_deref().unwrap_or("-"),
        "selection complete"
    );

    Ok(SelectionResult {
        ranking,
        filter,
        pareto,
        pareto_metrics,
        recommended,
        top_k,
        alternatives,
        weights,
        explanation,
    })
}
