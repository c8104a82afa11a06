//! Min-max normalization.

use super::config::{Orientation, OrientationTable};
use crate::catalog::{Catalog, Metric};
use std::collections::BTreeMap;
use tracing::debug;

/// Observed raw range of one metric over the normalized subset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
    pub orientation: Orientation,
}

impl MetricRange {
    /// Whether every candidate shares the same value.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Maps a raw value onto `[0, 1]` with 0 as best.
    ///
    /// The maximum maps to exactly 1 before orientation, including an
    /// infinite maximum whose span would otherwise divide to NaN.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let scaled = if value >= self.max {
            1.0
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        };
        match self.orientation {
            Orientation::Minimize => scaled,
            Orientation::Maximize => 1.0 - scaled,
        }
    }
}

/// A catalog subset augmented with per-metric normalized values.
///
/// For each requested metric every candidate carries a value in `[0, 1]`
/// oriented so that 0 is best. Raw values remain available untouched through
/// [`catalog`](Self::catalog).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCatalog {
    catalog: Catalog,
    metrics: Vec<Metric>,
    ranges: BTreeMap<Metric, MetricRange>,
    values: BTreeMap<String, BTreeMap<Metric, f64>>,
}

impl NormalizedCatalog {
    /// The raw subset that was normalized.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Normalized metrics, deduplicated, in canonical order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the subset is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Candidate codes in lexical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Raw range of a normalized metric.
    pub fn range(&self, metric: Metric) -> Option<&MetricRange> {
        self.ranges.get(&metric)
    }

    /// Normalized value of `metric` for `code`, if both are present.
    pub fn value(&self, code: &str, metric: Metric) -> Option<f64> {
        self.values.get(code)?.get(&metric).copied()
    }

    /// All normalized values of one candidate.
    pub fn values_of(&self, code: &str) -> Option<&BTreeMap<Metric, f64>> {
        self.values.get(code)
    }

    /// `(code, normalized values)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeMap<Metric, f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Normalized values of one candidate keyed as `<metric>_norm`.
    pub fn named_values(&self, code: &str) -> Option<BTreeMap<String, f64>> {
        self.values.get(code).map(|values| {
            values
                .iter()
                .map(|(m, v)| (format!("{}_norm", m.name()), *v))
                .collect()
        })
    }

    /// Restricts this view to the given codes without renormalizing.
    ///
    /// Ranges stay those of the original subset.
    pub fn restrict<S: AsRef<str>>(&self, codes: &[S]) -> NormalizedCatalog {
        let keep = |code: &str| codes.iter().any(|c| c.as_ref() == code);
        Self {
            catalog: self.catalog.subset(codes),
            metrics: self.metrics.clone(),
            ranges: self.ranges.clone(),
            values: self
                .values
                .iter()
                .filter(|(code, _)| keep(code.as_str()))
                .map(|(code, v)| (code.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Min-max normalizes `metrics` across `catalog`.
///
/// For each metric, `(value - min) / (max - min)` for minimized metrics and
/// its complement for maximized ones, so 0 is always best. When `max == min`
/// the metric carries no discriminating information and every candidate
/// gets 0.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// use u_tradeoff::catalog::{Catalog, Metric};
/// use u_tradeoff::normalize::{normalize, OrientationTable};
///
/// let rec = |cost: f64| -> BTreeMap<String, f64> {
///     Metric::REQUIRED
///         .iter()
///         .map(|m| (m.name().to_string(), if *m == Metric::SteelCost { cost } else { 1.0 }))
///         .collect()
/// };
/// let catalog = Catalog::from_records([("A", rec(10.0)), ("B", rec(15.0)), ("C", rec(20.0))]).unwrap();
///
/// let norm = normalize(&catalog, &[Metric::SteelCost], &OrientationTable::default());
/// assert_eq!(norm.value("A", Metric::SteelCost), Some(0.0));
/// assert_eq!(norm.value("B", Metric::SteelCost), Some(0.5));
/// assert_eq!(norm.value("C", Metric::SteelCost), Some(1.0));
/// ```
pub fn normalize(
    catalog: &Catalog,
    metrics: &[Metric],
    orientations: &OrientationTable,
) -> NormalizedCatalog {
    let mut metrics = metrics.to_vec();
    metrics.sort();
    metrics.dedup();

    let ranges: BTreeMap<Metric, MetricRange> = metrics
        .iter()
        .filter_map(|&metric| {
            catalog.range(metric).map(|(min, max)| {
                (
                    metric,
                    MetricRange {
                        min,
                        max,
                        orientation: orientations.get(metric),
                    },
                )
            })
        })
        .collect();

    let values = catalog
        .iter()
        .map(|candidate| {
            let normalized = ranges
                .iter()
                .map(|(&metric, range)| (metric, range.normalize(candidate.value(metric))))
                .collect();
            (candidate.code().to_string(), normalized)
        })
        .collect();

    debug!(
        candidates = catalog.len(),
        metrics = metrics.len(),
        "metrics normalized"
    );

    NormalizedCatalog {
        catalog: catalog.clone(),
        metrics,
        ranges,
        values,
    }
}
