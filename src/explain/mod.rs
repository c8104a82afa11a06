//! Explainability generator.
//!
//! Pure formatting over results the pipeline already computed: the
//! winner's raw metrics, its decoded code, candidate counts, percentage gaps
//! to the best Pareto-optimal value of each metric, and a trade-off summary
//! against the runner-up.

mod generator;
mod types;

pub use generator::{explain, trade_off, ExplainInput};
pub use types::{Explanation, MetricDelta, MetricMargin, TradeOff};
