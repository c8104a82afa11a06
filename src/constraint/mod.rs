//! Constraint filter.
//!
//! Partitions a catalog into feasible and rejected candidates given an
//! ordered list of hard rules (logical AND):
//!
//! - **Metric constraints**: `{parameter, operator, value}` over raw fields
//! - **Mnemonic constraints**: predicates over the decoded solution code
//!   (join type, grouping, bar sizes, length granularity)
//!
//! Unknown metric names abort the whole pass before any candidate is
//! examined. Malformed solution codes only exclude the affected candidate.
//! Every rejection carries the full list of violated constraints so the
//! exclusion can be explained.

mod filter;
mod parse;
mod types;

pub use filter::{apply, validate, FilterOutcome, Rejection, SkippedCandidate};
pub use types::{
    Constraint, MnemonicPredicate, Observed, Operator, Violation, EQUALITY_TOLERANCE,
};
