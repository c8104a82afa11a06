//! Sensitivity analysis configuration.

use crate::error::{DecisionError, Result};
use crate::selection::SelectionConfig;

/// Monte-Carlo weight perturbation settings.
///
/// Each trial multiplies every weight by an independent factor drawn from
/// `U(1 − p, 1 + p)` where `p = max_relative_perturbation`.
///
/// # Examples
///
/// ```
/// use u_tradeoff::sensitivity::WeightRobustnessConfig;
///
/// let config = WeightRobustnessConfig::default()
///     .with_trials(500)
///     .with_max_relative_perturbation(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightRobustnessConfig {
    /// Number of perturbed rankings.
    pub trials: usize,

    /// Half-width of the relative perturbation band, in `[0, 1)`.
    pub max_relative_perturbation: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for WeightRobustnessConfig {
    fn default() -> Self {
        Self {
            trials: 200,
            max_relative_perturbation: 0.2,
            seed: None,
        }
    }
}

impl WeightRobustnessConfig {
    /// Sets the number of trials.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the perturbation half-width.
    pub fn with_max_relative_perturbation(mut self, p: f64) -> Self {
        self.max_relative_perturbation = p;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(DecisionError::InvalidConfig("trials must be at least 1".into()));
        }
        let p = self.max_relative_perturbation;
        if !(0.0..1.0).contains(&p) {
            return Err(DecisionError::InvalidConfig(format!(
                "max_relative_perturbation must be in [0, 1), got {p}"
            )));
        }
        Ok(())
    }
}

/// Configuration shared by every sensitivity run.
///
/// The selection config is applied identically to the baseline and to each
/// shocked rerun; explanations are never built for reruns.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityConfig {
    pub selection: SelectionConfig,
    pub robustness: WeightRobustnessConfig,
}

impl SensitivityConfig {
    /// Sets the selection config.
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the weight robustness config.
    pub fn with_robustness(mut self, robustness: WeightRobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Selection config used for reruns.
    pub(crate) fn rerun_selection(&self) -> SelectionConfig {
        self.selection.clone().with_explain(false)
    }

    /// Validates both parts.
    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        self.robustness.validate()
    }
}

/// Checks that a relative shock keeps the multiplier positive.
pub(crate) fn validate_shock(shock: f64) -> Result<()> {
    if !shock.is_finite() || shock <= -1.0 {
        return Err(DecisionError::InvalidConfig(format!(
            "shock must be finite and greater than -1, got {shock}"
        )));
    }
    Ok(())
}
