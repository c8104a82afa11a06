//! Sensitivity and what-if analyzer.
//!
//! Measures how stable a ranking is when inputs move:
//!
//! - [`analyze`]: one parameter shocked by a relative amount
//! - [`sweep`]: one parameter at several shock levels
//! - [`what_if`]: several shocks separately and combined
//! - [`weight_robustness`]: seeded Monte-Carlo perturbation of the weights
//!
//! Every shocked run works on a scratch [`Catalog`](crate::catalog::Catalog)
//! derived from the original; the original is never reachable mutably.
//! Invalid parameters, shocks and empty baselines are rejected before any
//! copy is built.

mod analyzer;
mod config;
mod robustness;
mod types;

pub use analyzer::{analyze, sweep, what_if};
pub use config::{SensitivityConfig, WeightRobustnessConfig};
pub use robustness::weight_robustness;
pub use types::{ImpactLevel, RobustnessReport, SensitivityResult, WhatIfResult};
