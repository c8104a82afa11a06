//! Pareto sets and layered fronts over a normalized catalog.

use super::dominance::{dominance_cmp, non_dominated_sort, Dominance};
use crate::catalog::Metric;
use crate::normalize::NormalizedCatalog;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Codes of the non-dominated candidates. Unordered by meaning; iterates in
/// code order.
pub type ParetoSet = BTreeSet<String>;

/// Every candidate assigned to a non-dominated front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoLayers {
    /// Codes per front; `fronts[0]` is the Pareto set.
    pub fronts: Vec<Vec<String>>,
    /// Front index per code.
    pub rank: BTreeMap<String, usize>,
}

impl ParetoLayers {
    /// Front 0 as a set.
    pub fn pareto_set(&self) -> ParetoSet {
        self.fronts
            .first()
            .map(|front| front.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Front index of a candidate.
    pub fn rank_of(&self, code: &str) -> Option<usize> {
        self.rank.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }
}

/// Codes and objective vectors in code order.
fn objective_matrix<'a>(
    normalized: &'a NormalizedCatalog,
    metrics: &[Metric],
) -> (Vec<&'a str>, Vec<Vec<Option<f64>>>) {
    normalized
        .entries()
        .map(|(code, values)| {
            let row = metrics.iter().map(|m| values.get(m).copied()).collect();
            (code, row)
        })
        .unzip()
}

fn is_dominated(i: usize, objectives: &[Vec<Option<f64>>]) -> bool {
    objectives
        .iter()
        .enumerate()
        .any(|(j, other)| j != i && dominance_cmp(other, &objectives[i]) == Dominance::Left)
}

/// Candidates of `normalized` not dominated by any other on `metrics`.
///
/// Exhaustive pairwise comparison, `O(n² · m)`. A metric missing on either
/// side of a pair is skipped for that pair. Identical profiles never
/// dominate each other. With the `parallel` feature the per-candidate checks
/// run on the rayon pool; the result is the same set.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// use u_tradeoff::catalog::{Catalog, Metric};
/// use u_tradeoff::normalize::{normalize, OrientationTable};
/// use u_tradeoff::pareto::pareto_front;
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
///     ("A", rec(100.0, 60.0)),
///     ("B", rec(120.0, 50.0)),
///     ("C", rec(130.0, 65.0)),
/// ])
/// .unwrap();
///
/// let metrics = [Metric::SteelCost, Metric::DurationDays];
/// let norm = normalize(&catalog, &metrics, &OrientationTable::default());
/// let front = pareto_front(&norm, &metrics);
/// assert_eq!(front.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
/// ```
pub fn pareto_front(normalized: &NormalizedCatalog, metrics: &[Metric]) -> ParetoSet {
    let (codes, objectives) = objective_matrix(normalized, metrics);

    #[cfg(feature = "parallel")]
    let front: ParetoSet = {
        use rayon::prelude::*;
        (0..codes.len())
            .into_par_iter()
            .filter(|&i| !is_dominated(i, &objectives))
            .map(|i| codes[i].to_string())
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let front: ParetoSet = (0..codes.len())
        .filter(|&i| !is_dominated(i, &objectives))
        .map(|i| codes[i].to_string())
        .collect();

    debug!(
        candidates = codes.len(),
        metrics = metrics.len(),
        pareto = front.len(),
        "pareto front computed"
    );
    front
}

/// Sorts every candidate into successive non-dominated fronts.
///
/// Front 0 equals [`pareto_front`]; front `k` is what remains
/// non-dominated once fronts `0..k` are removed.
pub fn pareto_layers(normalized: &NormalizedCatalog, metrics: &[Metric]) -> ParetoLayers {
    let (codes, objectives) = objective_matrix(normalized, metrics);
    let sorted = non_dominated_sort(&objectives);

    let fronts: Vec<Vec<String>> = sorted
        .fronts
        .iter()
        .map(|front| front.iter().map(|&i| codes[i].to_string()).collect())
        .collect();
    let rank = codes
        .iter()
        .zip(&sorted.ranks)
        .map(|(code, &r)| (code.to_string(), r))
        .collect();

    ParetoLayers { fronts, rank }
}
