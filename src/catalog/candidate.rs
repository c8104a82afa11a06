//! Candidate solutions and the raw record input contract.

use super::metric::Metric;
use std::collections::BTreeMap;

/// One raw catalog record: a flat map of field name to numeric value.
///
/// This is the single canonical input shape. Producing it from spreadsheets
/// or BIM exports is the ingestion collaborator's job.
pub type RawRecord = BTreeMap<String, f64>;

/// Raw records keyed by solution code.
///
/// With the `serde` feature this deserializes directly from the JSON object
/// form `{ "<code>": { "<field>": <number>, ... }, ... }`.
pub type RawCatalog = BTreeMap<String, RawRecord>;

/// A validated design alternative with a fixed KPI profile.
///
/// Instances are only created by [`Catalog`](super::Catalog) ingestion or by
/// deriving a scaled copy; there is no way to mutate one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    code: String,
    values: [f64; Metric::COUNT],
}

impl Candidate {
    /// Builds a candidate from already-validated required values.
    ///
    /// `required` is ordered like [`Metric::REQUIRED`]. The total cost is
    /// derived here.
    pub(crate) fn from_validated(code: String, required: [f64; 9]) -> Self {
        let mut values = [0.0; Metric::COUNT];
        values[..Metric::REQUIRED.len()].copy_from_slice(&required);
        values[Metric::TotalCost.index()] =
            values[Metric::SteelCost.index()] + values[Metric::ConcreteCost.index()];
        Self { code, values }
    }

    /// The unique solution code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Raw value of a metric.
    pub fn value(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// `steel_cost + concrete_cost`.
    pub fn total_cost(&self) -> f64 {
        self.value(Metric::TotalCost)
    }

    /// All metrics with their raw values, in canonical order.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.value(m)))
    }

    /// Returns a copy with every field in `targets` multiplied by `factor`.
    ///
    /// Derived fields are recomputed from the scaled components, so `targets`
    /// should only name record fields (see [`Metric::shock_targets`]).
    pub(crate) fn scaled(&self, targets: &[Metric], factor: f64) -> Self {
        let mut values = self.values;
        for &metric in targets {
            values[metric.index()] *= factor;
        }
        values[Metric::TotalCost.index()] =
            values[Metric::SteelCost.index()] + values[Metric::ConcreteCost.index()];
        Self {
            code: self.code.clone(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Candidate {
        Candidate::from_validated(
            "AG_EM_5a8_L50".into(),
            [98.5, 3850.0, 147750.0, 308000.0, 600.0, 68.0, 534.0, 2.7, 240.0],
        )
    }

    #[test]
    fn test_total_cost_derived() {
        let c = sample();
        assert!((c.total_cost() - 455750.0).abs() < 1e-9);
        assert!((c.value(Metric::TotalCost) - 455750.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_iterates_canonical_order() {
        let c = sample();
        let metrics: Vec<Metric> = c.metrics().map(|(m, _)| m).collect();
        assert_eq!(metrics, Metric::ALL.to_vec());
    }

    #[test]
    fn test_scaled_returns_new_value() {
        let c = sample();
        let shocked = c.scaled(&[Metric::SteelCost], 1.1);
        assert!((shocked.value(Metric::SteelCost) - 162525.0).abs() < 1e-6);
        assert!((shocked.total_cost() - (162525.0 + 308000.0)).abs() < 1e-6);
        // Original untouched
        assert!((c.value(Metric::SteelCost) - 147750.0).abs() < 1e-9);
        assert_eq!(shocked.code(), c.code());
    }
}
