//! Top-K selection pipeline.
//!
//! Chains the components into one request:
//! constraint filter → normalizer → {weighted-sum scorer, Pareto calculator}
//! → explanation.
//!
//! # Key Types
//!
//! - [`SelectionConfig`]: orientations, `top_k`, Pareto metrics, explanation toggle
//! - [`SelectionResult`]: ranking, filter outcome, Pareto set, recommendation
//!   and alternatives

mod config;
mod pipeline;

pub use config::SelectionConfig;
pub use pipeline::{select, SelectionResult};
