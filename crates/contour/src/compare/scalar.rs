//! Scalar comparison: the base case of the recursion.
//!
//! Equality wins over acceptance, so `compare(1, 1)` reports
//! `exact_match` while `compare(1, Integer)` reports `match`.

use contour_core::Value;

use crate::code::Code;
use crate::result::ComparisonResult;
use crate::shape::Shape;

/// Compare a value against a non-structural shape.
pub fn compare(value: &Value, shape: &Shape) -> ComparisonResult {
    let code = if shape.equals_value(value) {
        Code::ExactMatch
    } else if shape.accepts(value) {
        Code::Match
    } else {
        Code::Mismatch
    };
    ComparisonResult::leaf(value.clone(), shape.clone(), code)
}

pub(crate) fn universal(value: &Value) -> ComparisonResult {
    ComparisonResult::leaf(value.clone(), Shape::Anything, Code::ObjectUniversalMatch)
}
