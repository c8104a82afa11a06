//! Weighted-sum scorer.
//!
//! Collapses a normalized catalog into a single ranking number per
//! candidate using a non-negative weight map.
//!
//! # Key Types
//!
//! - [`WeightMap`]: metric → weight, validated on insert
//! - [`ObjectivePreset`]: named weight bundles (min cost, fastest, low carbon,
//!   high constructibility, balanced)
//! - [`OptimizationSpec`]: objective + weights + constraints for one request
//! - [`ScoreRecord`]: `{code, score, rank}` with lower scores ranked first
//!
//! # Partial weights
//!
//! The score of each candidate is renormalized by the weights of the metrics
//! actually present on it. When candidates differ in which metrics are
//! present, their scores rest on different weight bases and are compared as
//! an approximation.

mod scorer;
mod spec;
mod weights;

pub use scorer::{ranked_codes, score_weighted_sum, ScoreRecord};
pub use spec::OptimizationSpec;
pub use weights::{ObjectivePreset, WeightMap};
