//! Objective weights and named presets.

use crate::catalog::Metric;
use crate::error::{DecisionError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Non-negative weight per metric.
///
/// Weights need not sum to 1; the scorer renormalizes per candidate.
/// Keys iterate in canonical metric order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightMap {
    weights: BTreeMap<Metric, f64>,
}

impl WeightMap {
    /// An empty weight map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a weight map from `(metric name, weight)` pairs.
    ///
    /// Names accept the same aliases as [`Metric::lookup`]. A repeated
    /// metric keeps its last weight.
    ///
    /// # Errors
    ///
    /// [`DecisionError::UnknownMetric`] for an unknown name and
    /// [`DecisionError::InvalidWeight`] for a negative or non-finite weight.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut map = Self::new();
        for (name, weight) in pairs {
            map.insert(Metric::lookup(name)?, weight)?;
        }
        Ok(map)
    }

    /// Sets the weight of one metric.
    ///
    /// # Errors
    ///
    /// [`DecisionError::InvalidWeight`] for a negative or non-finite weight.
    pub fn insert(&mut self, metric: Metric, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DecisionError::InvalidWeight {
                metric: metric.name().to_string(),
                value: weight,
            });
        }
        self.weights.insert(metric, weight);
        Ok(())
    }

    /// Weight of a metric, if set.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.weights.get(&metric).copied()
    }

    /// `(metric, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.weights.iter().map(|(&m, &w)| (m, w))
    }

    /// Metrics with a weight set, in canonical order.
    pub fn metrics(&self) -> Vec<Metric> {
        self.weights.keys().copied().collect()
    }

    /// Metrics with a strictly positive weight.
    pub fn active_metrics(&self) -> Vec<Metric> {
        self.iter().filter(|&(_, w)| w > 0.0).map(|(m, _)| m).collect()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// A copy with every weight multiplied by its own factor.
    ///
    /// Negative products are clamped to zero.
    pub(crate) fn perturbed(&self, mut factor: impl FnMut(Metric) -> f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(&m, &w)| (m, (w * factor(m)).max(0.0)))
                .collect(),
        }
    }
}

/// Named, fully enumerated weight bundles.
///
/// # Examples
///
/// ```
/// use u_tradeoff::catalog::Metric;
/// use u_tradeoff::scoring::ObjectivePreset;
///
/// let weights = ObjectivePreset::MinCost.weights();
/// assert_eq!(weights.get(Metric::SteelCost), Some(0.45));
/// assert!((weights.total() - 1.0).abs() < 1e-9);
///
/// let preset: ObjectivePreset = "low_carbon".parse().unwrap();
/// assert_eq!(preset, ObjectivePreset::LowCarbon);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectivePreset {
    /// Heavy weight on steel and concrete cost.
    MinCost,
    /// Heavy weight on duration and manhours.
    Fastest,
    /// Heavy weight on CO2 and steel tonnage.
    LowCarbon,
    /// Heavy weight on the constructibility index.
    HighConstructibility,
    /// Equal weight across the eight record metrics other than concrete volume.
    Balanced,
}

impl ObjectivePreset {
    pub const ALL: [ObjectivePreset; 5] = [
        ObjectivePreset::MinCost,
        ObjectivePreset::Fastest,
        ObjectivePreset::LowCarbon,
        ObjectivePreset::HighConstructibility,
        ObjectivePreset::Balanced,
    ];

    /// Canonical preset name.
    pub fn name(self) -> &'static str {
        match self {
            ObjectivePreset::MinCost => "min_cost",
            ObjectivePreset::Fastest => "fastest",
            ObjectivePreset::LowCarbon => "low_carbon",
            ObjectivePreset::HighConstructibility => "high_construct",
            ObjectivePreset::Balanced => "balanced",
        }
    }

    /// One-sentence interpretation of what the preset prioritizes.
    pub fn description(self) -> &'static str {
        match self {
            ObjectivePreset::MinCost => {
                "minimize total cost, emphasizing steel and concrete with moderate weight on labor and schedule"
            }
            ObjectivePreset::Fastest => {
                "minimize construction time, weighting duration and manhours most heavily"
            }
            ObjectivePreset::LowCarbon => {
                "minimize embodied carbon, weighting CO2 emissions and steel tonnage most heavily"
            }
            ObjectivePreset::HighConstructibility => {
                "maximize constructibility, emphasizing the constructibility index and fewer bar geometries"
            }
            ObjectivePreset::Balanced => {
                "equal weight across cost, time, labor, CO2, tonnage, constructibility and bar geometries"
            }
        }
    }

    /// The preset's weight bundle.
    pub fn weights(self) -> WeightMap {
        let pairs: &[(Metric, f64)] = match self {
            ObjectivePreset::MinCost => &[
                (Metric::SteelCost, 0.45),
                (Metric::ConcreteCost, 0.25),
                (Metric::Manhours, 0.15),
                (Metric::DurationDays, 0.10),
                (Metric::Co2Tonnes, 0.05),
            ],
            ObjectivePreset::Fastest => &[
                (Metric::DurationDays, 0.55),
                (Metric::Manhours, 0.25),
                (Metric::SteelCost, 0.10),
                (Metric::ConcreteCost, 0.05),
                (Metric::Co2Tonnes, 0.05),
            ],
            ObjectivePreset::LowCarbon => &[
                (Metric::Co2Tonnes, 0.60),
                (Metric::SteelTonnage, 0.20),
                (Metric::DurationDays, 0.10),
                (Metric::SteelCost, 0.10),
            ],
            ObjectivePreset::HighConstructibility => &[
                (Metric::ConstructibilityIndex, 0.55),
                (Metric::BarGeometries, 0.25),
                (Metric::Manhours, 0.10),
                (Metric::DurationDays, 0.10),
            ],
            ObjectivePreset::Balanced => &[
                (Metric::SteelTonnage, 0.125),
                (Metric::SteelCost, 0.125),
                (Metric::ConcreteCost, 0.125),
                (Metric::Manhours, 0.125),
                (Metric::DurationDays, 0.125),
                (Metric::Co2Tonnes, 0.125),
                (Metric::ConstructibilityIndex, 0.125),
                (Metric::BarGeometries, 0.125),
            ],
        };
        WeightMap {
            weights: pairs.iter().copied().collect(),
        }
    }
}

impl fmt::Display for ObjectivePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectivePreset {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self> {
        let preset = match s.trim().to_ascii_lowercase().as_str() {
            "min_cost" | "minimize_cost" | "cost" => ObjectivePreset::MinCost,
            "fastest" | "minimize_duration" | "duration" | "minimize_manhours" => {
                ObjectivePreset::Fastest
            }
            "low_carbon" | "minimize_co2" | "co2" => ObjectivePreset::LowCarbon,
            "high_construct"
            | "high_constructibility"
            | "maximize_constructibility"
            | "constructibility" => ObjectivePreset::HighConstructibility,
            "balanced" => ObjectivePreset::Balanced,
            other => {
                return Err(DecisionError::InvalidConfig(format!(
                    "unknown objective preset '{other}'"
                )))
            }
        };
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_sum_to_one() {
        for preset in ObjectivePreset::ALL {
            let total = preset.weights().total();
            assert!((total - 1.0).abs() < 1e-9, "{preset}: {total}");
        }
    }

    #[test]
    fn test_balanced_equal_over_eight() {
        let weights = ObjectivePreset::Balanced.weights();
        assert_eq!(weights.len(), 8);
        assert!(weights.iter().all(|(_, w)| (w - 0.125).abs() < 1e-12));
        assert!(weights.get(Metric::ConcreteVolume).is_none());
    }

    #[test]
    fn test_preset_emphasis() {
        let heaviest = |p: ObjectivePreset| {
            p.weights()
                .iter()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(m, _)| m)
                .unwrap()
        };
        assert_eq!(heaviest(ObjectivePreset::MinCost), Metric::SteelCost);
        assert_eq!(heaviest(ObjectivePreset::Fastest), Metric::DurationDays);
        assert_eq!(heaviest(ObjectivePreset::LowCarbon), Metric::Co2Tonnes);
        assert_eq!(
            heaviest(ObjectivePreset::HighConstructibility),
            Metric::ConstructibilityIndex
        );
    }

    #[test]
    fn test_preset_parse() {
        for preset in ObjectivePreset::ALL {
            assert_eq!(preset.name().parse::<ObjectivePreset>().unwrap(), preset);
        }
        assert_eq!(
            "Minimize_CO2".parse::<ObjectivePreset>().unwrap(),
            ObjectivePreset::LowCarbon
        );
        assert!("cheapest".parse::<ObjectivePreset>().is_err());
    }

    #[test]
    fn test_weight_map_validation() {
        let map = WeightMap::from_pairs([("cost", 0.7), ("duration", 0.3)]).unwrap();
        assert_eq!(map.metrics(), vec![Metric::DurationDays, Metric::TotalCost]);

        assert!(matches!(
            WeightMap::from_pairs([("turbo_factor", 1.0)]),
            Err(DecisionError::UnknownMetric { .. })
        ));
        assert!(matches!(
            WeightMap::from_pairs([("manhours", -0.1)]),
            Err(DecisionError::InvalidWeight { .. })
        ));
        assert!(matches!(
            WeightMap::from_pairs([("manhours", f64::NAN)]),
            Err(DecisionError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_active_metrics_skip_zero() {
        let map = WeightMap::from_pairs([("manhours", 0.0), ("co2", 2.0)]).unwrap();
        assert_eq!(map.active_metrics(), vec![Metric::Co2Tonnes]);
        assert_eq!(map.len(), 2);
    }
}
