//! Catalog model and ingestion.
//!
//! A [`Catalog`] is the validated, immutable set of candidate solutions for
//! one analysis session. It is created once from raw records supplied by an
//! external ingestion step and passed explicitly to every component; there is
//! no process-wide cached catalog.
//!
//! # Key Types
//!
//! - [`Metric`]: Closed vocabulary of KPIs, including derived `total_cost`
//! - [`Candidate`]: One design alternative with its KPI profile
//! - [`Catalog`]: Immutable, code-ordered collection of candidates
//! - [`RawRecord`] / [`RawCatalog`]: The canonical input shape

mod candidate;
mod metric;
mod model;

pub use candidate::{Candidate, RawCatalog, RawRecord};
pub use metric::Metric;
pub use model::{Catalog, CatalogSummary};

#[cfg(test)]
pub(crate) use model::tests::{record, sample_catalog};
