//! Selection configuration.
//!
//! [`SelectionConfig`] holds everything that shapes a ranking besides the
//! optimization spec itself.

use crate::catalog::Metric;
use crate::error::{DecisionError, Result};
use crate::normalize::OrientationTable;

/// Configuration for the selection pipeline.
///
/// # Defaults
///
/// ```
/// use u_tradeoff::selection::SelectionConfig;
///
/// let config = SelectionConfig::default();
/// assert_eq!(config.top_k, 5);
/// assert!(config.pareto_metrics.is_none());
/// assert!(config.explain);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tradeoff::catalog::Metric;
/// use u_tradeoff::selection::SelectionConfig;
///
/// let config = SelectionConfig::default()
///     .with_top_k(3)
///     .with_pareto_metrics(vec![Metric::TotalCost, Metric::DurationDays, Metric::Co2Tonnes])
///     .with_explain(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionConfig {
    /// Minimize/maximize per metric.
    pub orientations: OrientationTable,

    /// Number of recommendations returned.
    pub top_k: usize,

    /// Metrics the Pareto front is computed over.
    ///
    /// `None` uses the metrics carrying a positive weight.
    pub pareto_metrics: Option<Vec<Metric>>,

    /// Whether to build an [`Explanation`](crate::explain::Explanation).
    pub explain: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            orientations: OrientationTable::default(),
            top_k: 5,
            pareto_metrics: None,
            explain: true,
        }
    }
}

impl SelectionConfig {
    /// Sets the orientation table.
    pub fn with_orientations(mut self, orientations: OrientationTable) -> Self {
        self.orientations = orientations;
        self
    }

    /// Sets the number of recommendations.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Fixes the Pareto metric list.
    pub fn with_pareto_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.pareto_metrics = Some(metrics);
        self
    }

    /// Enables or disables explanation output.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`DecisionError::InvalidConfig`] for `top_k == 0` or an empty explicit
    /// Pareto metric list.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(DecisionError::InvalidConfig("top_k must be at least 1".into()));
        }
        if matches!(&self.pareto_metrics, Some(m) if m.is_empty()) {
            return Err(DecisionError::InvalidConfig(
                "pareto_metrics must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(SelectionConfig::default().validate().is_ok());
        assert!(SelectionConfig::default().with_top_k(0).validate().is_err());
        assert!(SelectionConfig::default()
            .with_pareto_metrics(vec![])
            .validate()
            .is_err());
    }
}
