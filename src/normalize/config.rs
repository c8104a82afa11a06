//! Metric orientation table.

use crate::catalog::Metric;
use std::fmt;

/// Whether lower or higher raw values are preferred for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Lower raw values are better.
    Minimize,
    /// Higher raw values are better.
    Maximize,
}

impl Orientation {
    /// Whether `a` is strictly better than `b` in raw units.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Orientation::Minimize => a < b,
            Orientation::Maximize => a > b,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Minimize => f.write_str("minimize"),
            Orientation::Maximize => f.write_str("maximize"),
        }
    }
}

/// Fixed, pre-declared orientation per metric.
///
/// Orientation is configuration, never inferred from data.
///
/// # Defaults
///
/// Every metric is minimized except `constructibility_index`, which is
/// maximized: a higher index means an easier build.
///
/// ```
/// use u_tradeoff::catalog::Metric;
/// use u_tradeoff::normalize::{Orientation, OrientationTable};
///
/// let table = OrientationTable::default();
/// assert_eq!(table.get(Metric::SteelCost), Orientation::Minimize);
/// assert_eq!(table.get(Metric::ConstructibilityIndex), Orientation::Maximize);
///
/// let table = table.with(Metric::ConstructibilityIndex, Orientation::Minimize);
/// assert_eq!(table.get(Metric::ConstructibilityIndex), Orientation::Minimize);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationTable {
    orientations: [Orientation; Metric::COUNT],
}

impl Default for OrientationTable {
    fn default() -> Self {
        Self::all_minimize().with(Metric::ConstructibilityIndex, Orientation::Maximize)
    }
}

impl OrientationTable {
    /// Every metric minimized.
    pub fn all_minimize() -> Self {
        Self {
            orientations: [Orientation::Minimize; Metric::COUNT],
        }
    }

    /// Sets the orientation of one metric.
    pub fn with(mut self, metric: Metric, orientation: Orientation) -> Self {
        self.orientations[metric.index()] = orientation;
        self
    }

    /// Orientation of a metric.
    pub fn get(&self, metric: Metric) -> Orientation {
        self.orientations[metric.index()]
    }
}
