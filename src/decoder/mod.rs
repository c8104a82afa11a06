//! Solution code decoder.
//!
//! Candidate codes are naming mnemonics that encode design attributes:
//!
//! ```text
//! [AG_]<JOIN>_<BARS>_L<LEN>
//!   AG_   grouped (standardized lengths)
//!   JOIN  EM (mechanical couplers) | TR (lap splices)
//!   BARS  <n> | <min>a<max>
//!   LEN   cutting length granularity, cm
//! ```
//!
//! [`decode`] parses a code once into a typed [`SolutionCode`]; the
//! constraint filter and the explanation generator consume that value rather
//! than re-reading strings.

mod code;

pub use code::{decode, JoinType, SolutionCode};
