//! Metric normalizer.
//!
//! Rescales raw KPIs onto a common `[0, 1]` basis where 0 is always best,
//! using each metric's pre-declared [`Orientation`]. The result is a new
//! [`NormalizedCatalog`] view; the source catalog is never modified.

mod config;
mod normalizer;

pub use config::{Orientation, OrientationTable};
pub use normalizer::{normalize, MetricRange, NormalizedCatalog};
