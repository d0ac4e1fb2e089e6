//! Test assertions.
//!
//! `assert_shape!` and `assert_not_shape!` compare through the process-wide
//! registry and, on failure, panic with the full decision tree.
//!
//! ```
//! use contour::{assert_not_shape, assert_shape, Shape, Value};
//!
//! assert_shape!(Value::seq([1, 2, 3]), Shape::seq([Shape::INTEGER]));
//! assert_not_shape!(Value::from("abc-not-a-uuid"), Shape::sym("$uuid"));
//! ```

use contour_core::Value;

use crate::result::ComparisonResult;
use crate::shape::Shape;

/// Compare for an assertion macro. Not part of the public API.
#[doc(hidden)]
pub fn __check(value: impl Into<Value>, shape: impl Into<Shape>) -> ComparisonResult {
    let value = value.into();
    let shape = shape.into();
    match crate::compare(&value, &shape) {
        Ok(result) => result,
        Err(e) => panic!("comparison of {value} against {shape} failed: {e}"),
    }
}

/// Assert that a value matches a shape.
#[macro_export]
macro_rules! assert_shape {
    ($value:expr, $shape:expr $(,)?) => {{
        let result = $crate::assertions::__check($value, $shape);
        if !result.is_match() {
            panic!("expected value to match shape\n{}", result);
        }
    }};
}

/// Assert that a value does not match a shape.
#[macro_export]
macro_rules! assert_not_shape {
    ($value:expr, $shape:expr $(,)?) => {{
        let result = $crate::assertions::__check($value, $shape);
        if result.is_match() {
            panic!("expected value not to match shape\n{}", result);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn passes_on_expected_outcomes() {
        assert_shape!(1, 1);
        assert_shape!("x", crate::Shape::STRING);
        assert_not_shape!(1, crate::Shape::STRING);
    }

    #[test]
    #[should_panic(expected = "expected value to match shape")]
    fn fails_with_diagnostics() {
        assert_shape!(vec![1, 2], vec![crate::Shape::STRING]);
    }

    #[test]
    #[should_panic(expected = "unknown shape")]
    fn misuse_panics_with_the_error() {
        assert_shape!(1, crate::Shape::sym("$assertions_missing"));
    }
}
