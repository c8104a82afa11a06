//! Shock-based sensitivity and what-if analysis.

use super::config::{validate_shock, SensitivityConfig};
use super::types::{RankingShift, SensitivityResult, WhatIfResult};
use crate::catalog::{Catalog, Metric};
use crate::error::{DecisionError, Result};
use crate::scoring::{ranked_codes, OptimizationSpec};
use crate::selection::{select, SelectionResult};
use tracing::{debug, info};

/// Runs the baseline selection and refuses to continue without a winner.
pub(crate) fn feasible_baseline(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    config: &SensitivityConfig,
) -> Result<SelectionResult> {
    let baseline = select(catalog, spec, &config.rerun_selection())?;
    if baseline.is_empty() {
        return Err(DecisionError::NoFeasibleBaseline {
            rejected: baseline.filter.rejected.len(),
            skipped: baseline.filter.skipped.len(),
        });
    }
    Ok(baseline)
}

/// Rejects shocks that would push any scratch-copy value past `f64::MAX`.
///
/// `shocks` compound in order, as in the combined what-if scenario.
fn check_shocked_finite(catalog: &Catalog, shocks: &[(Metric, f64)]) -> Result<()> {
    for candidate in catalog.iter() {
        let shocked = shocks.iter().fold(candidate.clone(), |c, &(metric, shock)| {
            c.scaled(metric.shock_targets(), 1.0 + shock)
        });
        if let Some(metric) = Metric::ALL.iter().find(|&&m| !shocked.value(m).is_finite()) {
            return Err(DecisionError::InvalidConfig(format!(
                "shock overflows {metric} for {}",
                candidate.code()
            )));
        }
    }
    Ok(())
}

fn rerun(
    shocked: &Catalog,
    spec: &OptimizationSpec,
    config: &SensitivityConfig,
) -> Result<Vec<String>> {
    let result = select(shocked, spec, &config.rerun_selection())?;
    Ok(ranked_codes(&result.ranking))
}

/// Measures how a relative shock to one parameter moves the ranking.
///
/// 1. Rank the unmodified catalog under `spec`
/// 2. Build a scratch copy with `parameter` multiplied by `1 + shock` on
///    every candidate (`total_cost` scales both cost components)
/// 3. Rank the copy under the same spec
///
/// `catalog` is never modified; the copy is dropped on return.
///
/// # Errors
///
/// - [`DecisionError::UnknownMetric`] for an undefined parameter
/// - [`DecisionError::InvalidConfig`] for `shock <= -1`, a shock that
///   overflows a value to infinity, or a bad config
/// - [`DecisionError::NoFeasibleBaseline`] when the baseline has no winner
///
/// All of these are raised before any copy is built.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// use u_tradeoff::catalog::{Catalog, Metric};
/// use u_tradeoff::scoring::{ObjectivePreset, OptimizationSpec};
/// use u_tradeoff::sensitivity::{analyze, SensitivityConfig};
///
/// let rec = |steel: f64, concrete: f64| -> BTreeMap<String, f64> {
///     Metric::REQUIRED
///         .iter()
///         .map(|m| {
///             let v = match m {
///                 Metric::SteelCost => steel,
///                 Metric::ConcreteCost => concrete,
///                 _ => 1.0,
///             };
///             (m.name().to_string(), v)
///         })
///         .collect()
/// };
/// let catalog = Catalog::from_records([
///     ("EM_6_L10", rec(100.0, 300.0)),
///     ("TR_6_L10", rec(90.0, 320.0)),
/// ])
/// .unwrap();
///
/// let spec = OptimizationSpec::new(ObjectivePreset::MinCost);
/// let result = analyze(&catalog, &spec, "steel_cost", 0.10, &SensitivityConfig::default()).unwrap();
/// assert_eq!(result.original_ranking.len(), 2);
/// assert!((0.0..=1.0).contains(&result.impact_score));
/// assert_eq!(catalog.get("TR_6_L10").unwrap().value(Metric::SteelCost), 90.0);
/// ```
pub fn analyze(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    parameter: &str,
    shock: f64,
    config: &SensitivityConfig,
) -> Result<SensitivityResult> {
    let metric = Metric::lookup(parameter)?;
    validate_shock(shock)?;
    config.validate()?;
    check_shocked_finite(catalog, &[(metric, shock)])?;

    let baseline = feasible_baseline(catalog, spec, config)?;
    let result = shocked_result(catalog, spec, config, &baseline, metric, shock)?;

    info!(
        parameter = %metric,
        shock,
        impact = result.impact_score,
        top_changed = result.top_changed(),
        "sensitivity analyzed"
    );
    Ok(result)
}

fn shocked_result(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    config: &SensitivityConfig,
    baseline: &SelectionResult,
    metric: Metric,
    shock: f64,
) -> Result<SensitivityResult> {
    let shocked = catalog.scaled(metric, 1.0 + shock);
    let new_ranking = rerun(&shocked, spec, config)?;
    Ok(SensitivityResult::new(
        metric,
        catalog.mean(metric).unwrap_or_default(),
        shock,
        ranked_codes(&baseline.ranking),
        new_ranking,
    ))
}

/// Runs [`analyze`] for one parameter at each shock in `shocks`.
///
/// The baseline is computed once. Every shock is validated before any copy
/// is built.
pub fn sweep(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    parameter: &str,
    shocks: &[f64],
    config: &SensitivityConfig,
) -> Result<Vec<SensitivityResult>> {
    let metric = Metric::lookup(parameter)?;
    for &shock in shocks {
        validate_shock(shock)?;
        check_shocked_finite(catalog, &[(metric, shock)])?;
    }
    config.validate()?;

    let baseline = feasible_baseline(catalog, spec, config)?;
    let results = shocks
        .iter()
        .map(|&shock| shocked_result(catalog, spec, config, &baseline, metric, shock))
        .collect::<Result<Vec<_>>>()?;

    debug!(parameter = %metric, points = results.len(), "shock sweep complete");
    Ok(results)
}

/// Applies several shocks one at a time and all together.
///
/// Each `(parameter, shock)` pair produces its own [`SensitivityResult`].
/// The combined scenario multiplies every listed parameter at once (a
/// parameter listed twice compounds) and reports whether the winner
/// changes.
///
/// # Errors
///
/// Same as [`analyze`], checked for every pair before any copy is built.
pub fn what_if(
    catalog: &Catalog,
    spec: &OptimizationSpec,
    shocks: &[(&str, f64)],
    config: &SensitivityConfig,
) -> Result<WhatIfResult> {
    let resolved = shocks
        .iter()
        .map(|&(name, shock)| {
            let metric = Metric::lookup(name)?;
            validate_shock(shock)?;
            Ok((metric, shock))
        })
        .collect::<Result<Vec<_>>>()?;
    config.validate()?;
    for &pair in &resolved {
        check_shocked_finite(catalog, &[pair])?;
    }
    check_shocked_finite(catalog, &resolved)?;

    let baseline = feasible_baseline(catalog, spec, config)?;
    let scenarios = resolved
        .iter()
        .map(|&(metric, shock)| shocked_result(catalog, spec, config, &baseline, metric, shock))
        .collect::<Result<Vec<_>>>()?;

    let combined = resolved
        .iter()
        .fold(catalog.clone(), |acc, &(metric, shock)| acc.scaled(metric, 1.0 + shock));
    let original_ranking = ranked_codes(&baseline.ranking);
    let combined_ranking = rerun(&combined, spec, config)?;
    let shift = RankingShift::between(&original_ranking, &combined_ranking);
    let top_changed = original_ranking.first() != combined_ranking.first();

    info!(
        shocks = resolved.len(),
        impact = shift.impact_score,
        top_changed,
        "what-if analyzed"
    );

    Ok(WhatIfResult {
        scenarios,
        shocks: resolved,
        original_ranking,
        combined_ranking,
        rank_deltas: shift.rank_deltas,
        impact_score: shift.impact_score,
        dropped: shift.dropped,
        entered: shift.entered,
        top_changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{record, sample_catalog};
    use crate::constraint::Constraint;
    use crate::scoring::ObjectivePreset;

    #[test]
    fn test_original_catalog_unchanged() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let steel_before: Vec<f64> = catalog.iter().map(|c| c.value(Metric::SteelCost)).collect();

        let result = analyze(
            &catalog,
            &OptimizationSpec::new(ObjectivePreset::MinCost),
            "steel_cost",
            0.10,
            &SensitivityConfig::default(),
        )
        .unwrap();

        assert_eq!(catalog, before);
        let steel_after: Vec<f64> = catalog.iter().map(|c| c.value(Metric::SteelCost)).collect();
        assert_eq!(steel_before, steel_after);
        assert_eq!(result.parameter, Metric::SteelCost);
        assert_eq!(result.shock_percentage, 0.10);
    }

    #[test]
    fn test_uniform_shock_keeps_order() {
        // Min-max normalization is scale invariant: a uniform multiplicative
        // shock cannot reorder candidates.
        let result = analyze(
            &sample_catalog(),
            &OptimizationSpec::new(ObjectivePreset::Balanced),
            "cost",
            0.25,
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert_eq!(result.parameter, Metric::TotalCost);
        assert_eq!(result.original_ranking, result.new_ranking);
        assert_eq!(result.impact_score, 0.0);
        assert!(result.rank_deltas.values().all(|&d| d == 0));
        assert!(!result.top_changed());
    }

    #[test]
    fn test_base_value_is_mean() {
        let catalog = sample_catalog();
        let result = analyze(
            &catalog,
            &OptimizationSpec::new(ObjectivePreset::MinCost),
            "manhours",
            0.05,
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert!((result.base_value - (600.0 + 570.0 + 560.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_shock_moves_candidates_across_constraint() {
        // +5% duration puts both feasible candidates above 64 days
        // (62 * 1.05 = 65.1), so the whole feasible set drops out.
        let spec = OptimizationSpec::new(ObjectivePreset::Fastest)
            .with_constraint(Constraint::parse("duration_days <= 64").unwrap());
        let result = analyze(
            &sample_catalog(),
            &spec,
            "duration",
            0.05,
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert_eq!(result.original_ranking, vec!["EM_6a6_L100", "TR_6_L10"]);
        assert!(result.new_ranking.is_empty());
        assert_eq!(result.dropped, vec!["EM_6a6_L100", "TR_6_L10"]);
        assert!(result.rank_deltas.is_empty());
        assert_eq!(result.impact_score, 0.0);
        assert!(result.top_changed());

        // A 10% decrease brings AG_EM_5a8_L50 (68 days) in at 61.2.
        let result = analyze(
            &sample_catalog(),
            &spec,
            "duration",
            -0.10,
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert_eq!(result.entered, vec!["AG_EM_5a8_L50"]);
    }

    #[test]
    fn test_errors_before_copy() {
        let catalog = sample_catalog();
        let spec = OptimizationSpec::new(ObjectivePreset::MinCost);
        let config = SensitivityConfig::default();

        assert_eq!(
            analyze(&catalog, &spec, "turbo_factor", 0.1, &config),
            Err(DecisionError::UnknownMetric {
                name: "turbo_factor".into()
            })
        );
        assert!(matches!(
            analyze(&catalog, &spec, "steel_cost", -1.0, &config),
            Err(DecisionError::InvalidConfig(_))
        ));

        let impossible = spec.with_constraint(Constraint::parse("cost < 1").unwrap());
        assert_eq!(
            analyze(&catalog, &impossible, "steel_cost", 0.1, &config),
            Err(DecisionError::NoFeasibleBaseline {
                rejected: 3,
                skipped: 0
            })
        );
    }

    #[test]
    fn test_overflowing_shock_rejected() {
        let catalog = Catalog::from_records([
            ("EM_6_L10", record([1.0, 1.0, 1e300, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])),
            ("EM_6_L20", record([1.0, 1.0, 1e200, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])),
            ("EM_6_L50", record([1.0, 1.0, 1e100, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])),
        ])
        .unwrap();
        let spec = OptimizationSpec::new(ObjectivePreset::MinCost);
        let config = SensitivityConfig::default();

        assert!(matches!(
            analyze(&catalog, &spec, "steel_cost", 1e10, &config),
            Err(DecisionError::InvalidConfig(_))
        ));
        assert!(matches!(
            sweep(&catalog, &spec, "steel_cost", &[0.1, 1e10], &config),
            Err(DecisionError::InvalidConfig(_))
        ));
        // Each shock alone stays finite; compounded they overflow.
        assert!(matches!(
            what_if(
                &catalog,
                &spec,
                &[("steel_cost", 1e5), ("steel_cost", 1e5)],
                &config
            ),
            Err(DecisionError::InvalidConfig(_))
        ));

        let result = analyze(&catalog, &spec, "steel_cost", 0.5, &config).unwrap();
        assert_eq!(result.new_ranking[0], "EM_6_L50");
        assert_eq!(result.new_ranking, result.original_ranking);
    }

    #[test]
    fn test_sweep_one_result_per_shock() {
        let results = sweep(
            &sample_catalog(),
            &OptimizationSpec::new(ObjectivePreset::LowCarbon),
            "co2",
            &[-0.2, 0.0, 0.2],
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.shock_percentage).collect::<Vec<_>>(),
            vec![-0.2, 0.0, 0.2]
        );
        assert!(results.iter().all(|r| r.impact_score == 0.0));

        assert!(sweep(
            &sample_catalog(),
            &OptimizationSpec::new(ObjectivePreset::LowCarbon),
            "co2",
            &[0.1, -2.0],
            &SensitivityConfig::default(),
        )
        .is_err());
    }

    #[test]
    fn test_what_if_combined() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let spec = OptimizationSpec::new(ObjectivePreset::Fastest)
            .with_constraint(Constraint::parse("duration_days <= 64").unwrap());

        let result = what_if(
            &catalog,
            &spec,
            &[("steel_cost", 0.10), ("duration", 0.05)],
            &SensitivityConfig::default(),
        )
        .unwrap();

        assert_eq!(result.scenarios.len(), 2);
        assert_eq!(result.scenarios[0].parameter, Metric::SteelCost);
        assert!(!result.scenarios[0].top_changed());
        assert!(result.scenarios[1].top_changed());
        assert!(result.combined_ranking.is_empty());
        assert!(result.top_changed);
        assert_eq!(result.combined_top(), None);
        assert_eq!(catalog, before);
    }
}
