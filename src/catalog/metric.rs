//! Metric vocabulary.

use crate::error::{DecisionError, Result};
use std::fmt;
use std::str::FromStr;

/// A numeric KPI carried by every candidate.
///
/// The first nine variants are the required record fields; [`Metric::TotalCost`]
/// is derived at ingestion as `steel_cost + concrete_cost`.
///
/// Variant order is the canonical metric order used for every map keyed by
/// `Metric`, which keeps iteration (and therefore floating-point summation
/// order) deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    SteelTonnage,
    ConcreteVolume,
    SteelCost,
    ConcreteCost,
    Manhours,
    DurationDays,
    Co2Tonnes,
    ConstructibilityIndex,
    BarGeometries,
    TotalCost,
}

impl Metric {
    /// Number of metrics, derived ones included.
    pub const COUNT: usize = 10;

    /// Fields every catalog record must supply.
    pub const REQUIRED: [Metric; 9] = [
        Metric::SteelTonnage,
        Metric::ConcreteVolume,
        Metric::SteelCost,
        Metric::ConcreteCost,
        Metric::Manhours,
        Metric::DurationDays,
        Metric::Co2Tonnes,
        Metric::ConstructibilityIndex,
        Metric::BarGeometries,
    ];

    /// Every metric, in canonical order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::SteelTonnage,
        Metric::ConcreteVolume,
        Metric::SteelCost,
        Metric::ConcreteCost,
        Metric::Manhours,
        Metric::DurationDays,
        Metric::Co2Tonnes,
        Metric::ConstructibilityIndex,
        Metric::BarGeometries,
        Metric::TotalCost,
    ];

    /// Canonical field name, as it appears in catalog records.
    pub fn name(self) -> &'static str {
        match self {
            Metric::SteelTonnage => "steel_tonnage",
            Metric::ConcreteVolume => "concrete_volume",
            Metric::SteelCost => "steel_cost",
            Metric::ConcreteCost => "concrete_cost",
            Metric::Manhours => "manhours",
            Metric::DurationDays => "duration_days",
            Metric::Co2Tonnes => "co2_tonnes",
            Metric::ConstructibilityIndex => "constructibility_index",
            Metric::BarGeometries => "bar_geometries",
            Metric::TotalCost => "total_cost",
        }
    }

    /// Short unit label used when rendering explanations.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::SteelTonnage => "t",
            Metric::ConcreteVolume => "m3",
            Metric::SteelCost | Metric::ConcreteCost | Metric::TotalCost => "$",
            Metric::Manhours => "h",
            Metric::DurationDays => "days",
            Metric::Co2Tonnes => "tCO2",
            Metric::ConstructibilityIndex => "",
            Metric::BarGeometries => "geometries",
        }
    }

    /// Whether this metric is computed rather than supplied.
    pub fn is_derived(self) -> bool {
        matches!(self, Metric::TotalCost)
    }

    /// The record fields a relative shock on this metric must scale.
    ///
    /// Scaling both cost components scales their sum by the same factor.
    pub fn shock_targets(self) -> &'static [Metric] {
        match self {
            Metric::TotalCost => &[Metric::SteelCost, Metric::ConcreteCost],
            Metric::SteelTonnage => &[Metric::SteelTonnage],
            Metric::ConcreteVolume => &[Metric::ConcreteVolume],
            Metric::SteelCost => &[Metric::SteelCost],
            Metric::ConcreteCost => &[Metric::ConcreteCost],
            Metric::Manhours => &[Metric::Manhours],
            Metric::DurationDays => &[Metric::DurationDays],
            Metric::Co2Tonnes => &[Metric::Co2Tonnes],
            Metric::ConstructibilityIndex => &[Metric::ConstructibilityIndex],
            Metric::BarGeometries => &[Metric::BarGeometries],
        }
    }

    /// Resolves a metric name, accepting canonical names and short aliases
    /// (`cost`, `co2`, `duration`, `constructibility`), case-insensitively.
    ///
    /// # Errors
    ///
    /// [`DecisionError::UnknownMetric`] for anything else.
    pub fn lookup(name: &str) -> Result<Metric> {
        let key = name.trim().to_ascii_lowercase();
        let metric = match key.as_str() {
            "steel_tonnage" => Metric::SteelTonnage,
            "concrete_volume" => Metric::ConcreteVolume,
            "steel_cost" => Metric::SteelCost,
            "concrete_cost" => Metric::ConcreteCost,
            "manhours" => Metric::Manhours,
            "duration_days" | "duration" => Metric::DurationDays,
            "co2_tonnes" | "co2" => Metric::Co2Tonnes,
            "constructibility_index" | "constructibility" => Metric::ConstructibilityIndex,
            "bar_geometries" => Metric::BarGeometries,
            "total_cost" | "cost" => Metric::TotalCost,
            _ => {
                return Err(DecisionError::UnknownMetric {
                    name: name.to_string(),
                })
            }
        };
        Ok(metric)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self> {
        Metric::lookup(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::lookup(metric.name()).unwrap(), metric);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Metric::lookup("cost").unwrap(), Metric::TotalCost);
        assert_eq!(Metric::lookup("CO2").unwrap(), Metric::Co2Tonnes);
        assert_eq!(Metric::lookup(" duration ").unwrap(), Metric::DurationDays);
        assert_eq!(
            Metric::lookup("constructibility").unwrap(),
            Metric::ConstructibilityIndex
        );
    }

    #[test]
    fn test_unknown_metric() {
        let err = Metric::lookup("turbo_factor").unwrap_err();
        assert_eq!(
            err,
            DecisionError::UnknownMetric {
                name: "turbo_factor".into()
            }
        );
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
        assert!(Metric::REQUIRED.iter().all(|m| !m.is_derived()));
        assert!(Metric::TotalCost.is_derived());
    }

    #[test]
    fn test_total_cost_shock_targets_both_components() {
        assert_eq!(
            Metric::TotalCost.shock_targets(),
            &[Metric::SteelCost, Metric::ConcreteCost]
        );
        assert_eq!(Metric::Manhours.shock_targets(), &[Metric::Manhours]);
    }
}
