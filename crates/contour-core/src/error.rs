//! # Error Types — Structured Error Hierarchy
//!
//! Defines the single error enum used across contour. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A structural mismatch between a value and a shape is never an error.
//!   It is a non-matching comparison result.
//! - Errors signal programmer or configuration mistakes: calling a
//!   collection comparator with the wrong value category, referencing an
//!   unregistered shape, registering under a malformed name.
//! - `InvalidCode` and `InvalidChildResults` indicate a malformed result
//!   tree and point at an engine bug rather than bad input.

use thiserror::Error;

/// Top-level error type for contour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContourError {
    /// A category-specific comparator received a value of another category.
    #[error("type mismatch: checked value must be {expected}, found {found}")]
    TypeMismatch {
        /// The value category the comparator handles.
        expected: &'static str,
        /// The category of the value actually supplied.
        found: &'static str,
    },

    /// An outcome code outside the closed vocabulary.
    #[error("invalid code `{0}`: not part of the outcome vocabulary")]
    InvalidCode(String),

    /// A malformed child-result mapping.
    #[error("invalid child results: {0}")]
    InvalidChildResults(String),

    /// A symbolic shape reference with no registered definition.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// Registration under a name that is not a registrable key.
    #[error("invalid shape key `{0}`: keys must be `$`-prefixed names other than `$undefined`")]
    InvalidKey(String),

    /// Registration under a name that already has a definition.
    #[error("a shape is already registered under `{0}`")]
    DuplicateShapeKey(String),

    /// Recursion went deeper than the configured limit.
    #[error("comparison exceeded the maximum nesting depth of {limit}")]
    DepthLimitExceeded {
        /// The configured maximum depth.
        limit: usize,
    },

    /// A pattern shape whose regular expression does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// A JSON or YAML document could not be parsed into a value.
    #[error("serialization error: {0}")]
    Serialization(String),
}
