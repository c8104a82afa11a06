//! Optimization spec: objective, weights and constraints for one request.

use super::weights::{ObjectivePreset, WeightMap};
use crate::constraint::{self, Constraint};
use crate::error::{DecisionError, Result};

/// What to optimize and under which hard rules.
///
/// # Examples
///
/// ```
/// use u_tradeoff::constraint::Constraint;
/// use u_tradeoff::scoring::{ObjectivePreset, OptimizationSpec};
///
/// let spec = OptimizationSpec::new(ObjectivePreset::Fastest)
///     .with_constraint(Constraint::parse("cost <= 450000").unwrap());
///
/// assert_eq!(spec.effective_weights(), ObjectivePreset::Fastest.weights());
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationSpec {
    /// The headline objective; supplies weights when none are given.
    pub primary_objective: ObjectivePreset,
    /// Explicit weights. Empty means "use the primary objective's preset".
    pub weights: WeightMap,
    /// Hard rules, combined with logical AND.
    pub constraints: Vec<Constraint>,
}

impl OptimizationSpec {
    /// A spec using the preset's weights and no constraints.
    pub fn new(primary_objective: ObjectivePreset) -> Self {
        Self {
            primary_objective,
            weights: WeightMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Overrides the preset weights.
    pub fn with_weights(mut self, weights: WeightMap) -> Self {
        self.weights = weights;
        self
    }

    /// Appends one constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends several constraints, preserving order.
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// The weights actually used for scoring.
    pub fn effective_weights(&self) -> WeightMap {
        if self.weights.is_empty() {
            self.primary_objective.weights()
        } else {
            self.weights.clone()
        }
    }

    /// Checks weights and constraint metric names.
    ///
    /// # Errors
    ///
    /// [`DecisionError::UnknownMetric`] for an undefined constraint metric;
    /// [`DecisionError::InvalidWeight`] for a negative or non-finite weight,
    /// which only a deserialized map can hold;
    /// [`DecisionError::InvalidConfig`] when every effective weight is zero.
    pub fn validate(&self) -> Result<()> {
        constraint::validate(&self.constraints)?;
        if let Some((metric, value)) = self
            .weights
            .iter()
            .find(|&(_, w)| !w.is_finite() || w < 0.0)
        {
            return Err(DecisionError::InvalidWeight {
                metric: metric.name().to_string(),
                value,
            });
        }
        if self.effective_weights().active_metrics().is_empty() {
            return Err(DecisionError::InvalidConfig(
                "at least one weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl From<ObjectivePreset> for OptimizationSpec {
    fn from(preset: ObjectivePreset) -> Self {
        Self::new(preset)
    }
}
