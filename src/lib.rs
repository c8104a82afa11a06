//! Multi-objective decision support for engineering design catalogs.
//!
//! Ranks a small catalog of pre-computed design alternatives (tens of
//! candidates, each with a fixed KPI profile) against competing objectives:
//!
//! - **Catalog**: Validated, immutable candidate set with derived total cost.
//! - **Decoder**: Typed decomposition of mnemonic solution codes
//!   (`AG_EM_5a8_L50`).
//! - **Constraint filter**: Hard numeric and mnemonic rules with per-candidate
//!   rejection reasons.
//! - **Normalizer**: Orientation-aware min-max scaling onto `[0, 1]`.
//! - **Scoring**: Weighted-sum ranking with named objective presets.
//! - **Pareto**: Non-dominated sets and layered fronts.
//! - **Selection**: The end-to-end top-K pipeline.
//! - **Sensitivity**: Shock, sweep, what-if and weight-robustness analysis.
//! - **Explain**: Plain-text account of why a candidate won.
//!
//! # Architecture
//!
//! Every component is a pure function over an explicitly passed
//! [`Catalog`](catalog::Catalog) or derived view, producing a new value.
//! Nothing mutates its input, and there is no global state: a refreshed data
//! source means building a new catalog. Obtaining catalog records (spreadsheets,
//! BIM exports) is left to the caller.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use u_tradeoff::catalog::{Catalog, Metric};
//! use u_tradeoff::constraint::Constraint;
//! use u_tradeoff::scoring::{ObjectivePreset, OptimizationSpec};
//! use u_tradeoff::selection::{select, SelectionConfig};
//!
//! let rec = |steel_cost: f64, days: f64, co2: f64| -> BTreeMap<String, f64> {
//!     Metric::REQUIRED
//!         .iter()
//!         .map(|m| {
//!             let v = match m {
//!                 Metric::SteelCost => steel_cost,
//!                 Metric::DurationDays => days,
//!                 Metric::Co2Tonnes => co2,
//!                 Metric::ConstructibilityIndex => 2.5,
//!                 _ => 100.0,
//!             };
//!             (m.name().to_string(), v)
//!         })
//!         .collect()
//! };
//!
//! let catalog = Catalog::from_records([
//!     ("AG_EM_5a8_L50", rec(147_750.0, 68.0, 534.0)),
//!     ("TR_6_L10", rec(138_000.0, 63.0, 505.0)),
//!     ("EM_6a6_L100", rec(135_000.0, 62.0, 498.0)),
//! ])?;
//!
//! let spec = OptimizationSpec::new(ObjectivePreset::MinCost)
//!     .with_constraint(Constraint::parse("duration <= 65")?);
//! let result = select(&catalog, &spec, &SelectionConfig::default())?;
//!
//! assert_eq!(result.recommended.as_deref(), Some("EM_6a6_L100"));
//! assert_eq!(result.filter.rejected.len(), 1);
//! # Ok::<(), u_tradeoff::DecisionError>(())
//! ```

pub mod catalog;
pub mod constraint;
pub mod decoder;
pub mod error;
pub mod explain;
pub mod normalize;
pub mod pareto;
pub mod scoring;
pub mod selection;
pub mod sensitivity;

pub use error::{DecisionError, Result};
