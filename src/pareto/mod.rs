//! Pareto frontier calculator.
//!
//! Works on a [`NormalizedCatalog`](crate::normalize::NormalizedCatalog),
//! where every metric is oriented so that lower is better. Candidate A is
//! dominated by B iff B is no worse on every listed metric and strictly
//! better on at least one.
//!
//! # Algorithms
//!
//! - [`pareto_front`]: exhaustive pairwise check, candidates dominated by no one
//! - [`pareto_layers`]: fast non-dominated sorting into successive fronts
//!   (Deb et al., 2002)
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

mod dominance;
mod front;

pub use dominance::{dominance_cmp, non_dominated_sort, Dominance, NondominatedSortResult};
pub use front::{pareto_front, pareto_layers, ParetoLayers, ParetoSet};
