//! Monte-Carlo weight robustness.

use super::analyzer::feasible_baseline;
use super::config::SensitivityConfig;
use super::types::RobustnessReport;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::normalize::normalize;
use crate::scoring::{score_weighted_sum, OptimizationSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::info;

/// Re-ranks the feasible set under randomly perturbed weights.
///
/// Filtering and normalization do not depend on weights, so both are done
/// once and each trial only rescores. Every weight is multiplied by an
/// independent draw from `U(1 − p, 1 + p)`. With a fixed seed the report is
/// reproducible.
///
/// # Errors
///
/// Config validation failures, unknown constraint metrics, and
/// [`DecisionError::NoFeasibleBaseline`](crate::error::DecisionError::NoFeasibleBaseline).
pub fn weight_robustness(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    config: &SensitivityConfig,
) -> Result<RobustnessReport> {
    config.validate()?;
    let robustness = &config.robustness;

    let baseline = feasible_baseline(catalog, spec, config)?;
    let baseline_winner = baseline
        .recommended
        .clone()
        .unwrap_or_default();

    let weights = spec.effective_weights();
    let feasible = baseline.filter.feasible_catalog(catalog);
    let normalized = normalize(
        &feasible,
        &weights.active_metrics(),
        &config.selection.orientations,
    );

    let mut rng = StdRng::seed_from_u64(robustness.seed.unwrap_or_else(rand::random));
    let p = robustness.max_relative_perturbation;

    let mut win_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut rank_sums: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..robustness.trials {
        let perturbed = weights.perturbed(|_| {
            if p > 0.0 {
                rng.random_range((1.0 - p)..(1.0 + p))
            } else {
                1.0
            }
        });
        let ranking = score_weighted_sum(&normalized, &perturbed);
        if let Some(first) = ranking.first() {
            *win_counts.entry(first.code.clone()).or_default() += 1;
        }
        for record in &ranking {
            *rank_sums.entry(record.code.clone()).or_default() += record.rank;
        }
    }

    let trials = robustness.trials;
    let held = win_counts.get(&baseline_winner).copied().unwrap_or(0);
    let winner_stability = held as f64 / trials as f64;
    let mean_rank = rank_sums
        .into_iter()
        .map(|(code, sum)| (code, sum as f64 / trials as f64))
        .collect();

    info!(
        trials,
        winner = %baseline_winner,
        stability = winner_stability,
        "weight robustness analyzed"
    );

    Ok(RobustnessReport {
        trials,
        baseline_winner,
        winner_stability,
        win_counts,
        mean_rank,
    })
}
