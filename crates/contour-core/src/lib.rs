#![deny(missing_docs)]
//! # contour-core — Foundational Types for contour
//!
//! This crate is the leaf of the contour workspace. It defines the value
//! model that shapes are checked against and the error hierarchy shared by
//! every other crate. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One closed value enum.** Scalars, sequences and keyed maps are the
//!    variants of [`Value`]. Every consumer matches exhaustively on
//!    [`ValueKind`]; there is no runtime type inspection.
//!
//! 2. **Total structural equality.** `Value` implements `Eq` and `Hash`
//!    (floats by `total_cmp`, maps independent of entry order) so values can
//!    be deduplicated and used as map keys.
//!
//! 3. **Absence is a value.** [`Value::Undefined`] is the reserved marker for
//!    "this key is not present in the map". Only the matching engine produces
//!    it; conversions from JSON/YAML never do.
//!
//! 4. **Mismatches are data.** [`ContourError`] covers misuse of the API
//!    only. A value that does not fit its shape is reported through the
//!    comparison result, never through an error.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `contour-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod convert;
pub mod error;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::ContourError;
pub use value::{is_plain_symbol, Value, ValueKind, ValueMap};
