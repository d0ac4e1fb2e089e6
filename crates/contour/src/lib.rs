#![deny(missing_docs)]
//! # contour — Structural Shape Matching
//!
//! Compares a runtime [`Value`] against a declarative [`Shape`] and returns
//! a [`ComparisonResult`]: a tree recording every decision taken, so a
//! mismatch can be traced down to the element, key or value responsible.
//!
//! ```
//! use contour::{compare, Code, Shape, Value};
//!
//! let user = Value::map([
//!     (Value::sym("id"), Value::from("123e4567-e89b-12d3-a456-426614174000")),
//!     (Value::sym("tags"), Value::seq(["admin", "ops"])),
//! ]);
//! let shape = Shape::map([
//!     (Shape::sym("id"), Shape::sym("$uuid")),
//!     (Shape::sym("tags"), Shape::seq([Shape::STRING])),
//!     (Shape::sym("email"), Shape::any_of([Shape::STRING, Shape::UNDEFINED])),
//! ]);
//!
//! let result = compare(&user, &shape).unwrap();
//! assert!(result.is_match());
//! assert_eq!(result.code(), Code::MapMatch);
//! ```
//!
//! ## Crate Layout
//!
//! - [`shape`] / [`matcher`] / [`any_of`](mod@any_of): the shape language.
//! - [`compare`](mod@compare): the dispatcher and the scalar, sequence and map comparators.
//! - [`result`] / [`code`]: the decision tree and its closed outcome vocabulary.
//! - [`registry`]: named `$shapes` such as the built-in `$uuid`.
//! - [`config`]: recursion limits.
//!
//! ## Errors
//!
//! A value that does not fit its shape is a non-matching result, never an
//! error. [`ContourError`] is reserved for misuse: unknown shape names,
//! invalid registrations, runaway recursion.

pub mod any_of;
pub mod assertions;
pub mod code;
pub mod compare;
pub mod config;
pub mod matcher;
pub mod registry;
pub mod result;
pub mod shape;

pub use any_of::AnyOf;
pub use code::Code;
pub use compare::{Comparator, Scope};
pub use config::{CompareConfig, ConfigError};
pub use contour_core::{ContourError, Value, ValueKind, ValueMap};
pub use matcher::{Kind, Matcher, Pattern, Predicate, RangeShape};
pub use registry::ShapeRegistry;
pub use result::{Children, ComparisonResult, Label, ResultReport};
pub use shape::{CustomShape, Shape, ShapeMap};

/// Compare a value against a shape using the process-wide registry.
///
/// # Errors
///
/// See [`Comparator::compare`].
pub fn compare(value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
    Comparator::global().compare(value, shape)
}

/// Register a named shape in the process-wide registry.
///
/// # Errors
///
/// See [`ShapeRegistry::register`].
pub fn register_shape(key: &str, shape: impl Into<Shape>) -> Result<(), ContourError> {
    ShapeRegistry::global().register(key, shape)
}

/// Build an `AnyOf` shape.
pub fn any_of<I, T>(shapes: I) -> Shape
where
    I: IntoIterator<Item = T>,
    T: Into<Shape>,
{
    Shape::any_of(shapes)
}
