//! # Sequence Comparison
//!
//! A sequence shape is a set of alternatives: the value matches when every
//! element matches at least one sub-shape. Order and length are ignored,
//! so `[Integer]` accepts `[]`, `[1]` and `[1, 2, 3]`.
//!
//! ## Early exits
//!
//! Checked in order, each producing a childless result:
//!
//! | Condition | Code |
//! |-----------|------|
//! | shape is `Array` | `sequence_class_matches_any` |
//! | shape is not a sequence shape | `class_mismatch` |
//! | value equals shape | `sequence_exact_match` |
//! | value is empty | `sequence_empty` |
//!
//! Otherwise each distinct element gets one child, labelled by the element
//! and holding one grandchild per distinct sub-shape.

use std::collections::HashSet;

use contour_core::{ContourError, Value, ValueKind};

use crate::code::Code;
use crate::compare::Scope;
use crate::matcher::{Kind, Matcher};
use crate::result::{ComparisonResult, Label};
use crate::shape::Shape;

/// Compare a sequence value against a shape.
///
/// # Errors
///
/// Returns `ContourError::TypeMismatch` if `value` is not a sequence, and
/// propagates registry and depth-limit errors from nested comparisons.
pub fn compare(scope: &Scope<'_>, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
    let Value::Seq(items) = value else {
        return Err(ContourError::TypeMismatch {
            expected: ValueKind::Seq.name(),
            found: value.kind().name(),
        });
    };

    let sub_shapes = match shape {
        Shape::Matcher(Matcher::Kind(Kind::Array)) => {
            return Ok(early_exit(value, shape, Code::SequenceClassMatchesAny));
        }
        Shape::Seq(sub_shapes) => sub_shapes,
        _ => return Ok(early_exit(value, shape, Code::ClassMismatch)),
    };
    if shape.equals_value(value) {
        return Ok(early_exit(value, shape, Code::SequenceExactMatch));
    }
    if items.is_empty() {
        return Ok(early_exit(value, shape, Code::SequenceEmpty));
    }

    let mut seen = HashSet::new();
    let mut children = Vec::new();
    for element in items {
        if !seen.insert(element) {
            continue;
        }
        let result = compare_element(scope, element, shape, sub_shapes)?;
        children.push((Label::Value(element.clone()), result));
    }

    let code = if children.iter().all(|(_, r)| r.is_match()) {
        Code::SequenceMatch
    } else {
        Code::SequenceMismatch
    };
    Ok(ComparisonResult::branch(value.clone(), shape.clone(), code, children))
}

fn compare_element(
    scope: &Scope<'_>,
    element: &Value,
    shape: &Shape,
    sub_shapes: &[Shape],
) -> Result<ComparisonResult, ContourError> {
    let mut checks: Vec<(Label, ComparisonResult)> = Vec::with_capacity(sub_shapes.len());
    for (i, sub_shape) in sub_shapes.iter().enumerate() {
        if sub_shapes[..i].contains(sub_shape) {
            continue;
        }
        checks.push((Label::Shape(sub_shape.clone()), scope.compare(element, sub_shape)?));
    }
    let code = if checks.iter().any(|(_, r)| r.is_match()) {
        Code::SequenceElementMatch
    } else {
        Code::SequenceElementMismatch
    };
    Ok(ComparisonResult::branch(element.clone(), shape.clone(), code, checks))
}

fn early_exit(value: &Value, shape: &Shape, code: Code) -> ComparisonResult {
    ComparisonResult::leaf(value.clone(), shape.clone(), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Comparator;
    use crate::registry::ShapeRegistry;
    use std::sync::Arc;

    fn run(value: Value, shape: Shape) -> ComparisonResult {
        Comparator::new(Arc::new(ShapeRegistry::with_builtins()))
            .compare_sequence(&value, &shape)
            .unwrap()
    }

    #[test]
    fn early_exit_ladder() {
        assert_eq!(run(Value::seq([1]), Shape::ARRAY).code(), Code::SequenceClassMatchesAny);
        assert_eq!(run(Value::seq([1]), Shape::INTEGER).code(), Code::ClassMismatch);
        assert_eq!(run(Value::seq([1]), Shape::HASH).code(), Code::ClassMismatch);
        assert_eq!(run(Value::seq([1, 2]), Shape::seq([1, 2])).code(), Code::SequenceExactMatch);
        assert_eq!(run(Value::seq(Vec::<i64>::new()), Shape::seq([Shape::STRING])).code(), Code::SequenceEmpty);
        assert!(run(Value::seq([1]), Shape::ARRAY).is_leaf());
    }

    #[test]
    fn empty_shape_matches_only_empty_value() {
        assert_eq!(
            run(Value::seq(Vec::<i64>::new()), Shape::seq(Vec::<Shape>::new())).code(),
            Code::SequenceExactMatch
        );
        assert_eq!(run(Value::seq([1]), Shape::seq(Vec::<Shape>::new())).code(), Code::SequenceMismatch);
    }

    #[test]
    fn each_element_must_match_some_sub_shape() {
        let result = run(Value::seq([Value::Int(1), Value::from("a")]), Shape::seq([Shape::INTEGER, Shape::STRING]));
        assert_eq!(result.code(), Code::SequenceMatch);
        let one = result.child(&Label::Value(Value::Int(1))).unwrap();
        assert_eq!(one.code(), Code::SequenceElementMatch);
        assert_eq!(one.children().map(|c| c.len()), Some(2));

        let result = run(Value::seq([Value::Int(1), Value::Null]), Shape::seq([Shape::INTEGER]));
        assert_eq!(result.code(), Code::SequenceMismatch);
        assert_eq!(
            result.child(&Label::Value(Value::Null)).map(ComparisonResult::code),
            Some(Code::SequenceElementMismatch)
        );
    }

    #[test]
    fn duplicate_elements_are_checked_once() {
        let result = run(Value::seq([1, 1, 2, 1, 2]), Shape::seq([Shape::INTEGER]));
        assert_eq!(result.code(), Code::SequenceMatch);
        assert_eq!(result.children().map(|c| c.len()), Some(2));
    }

    #[test]
    fn order_is_irrelevant() {
        let shape = Shape::seq([1, 2]);
        assert_eq!(run(Value::seq([2, 1]), shape.clone()).code(), Code::SequenceMatch);
        assert_eq!(run(Value::seq([1, 2, 2]), shape).code(), Code::SequenceMatch);
    }

    #[test]
    fn nested_sequences_against_scalar_shapes_are_class_mismatches() {
        let result = run(Value::seq([Value::seq([1])]), Shape::seq([Shape::INTEGER]));
        assert_eq!(result.code(), Code::SequenceMismatch);
        let element = result.child(&Label::Value(Value::seq([1]))).unwrap();
        assert_eq!(element.code(), Code::SequenceElementMismatch);
        assert_eq!(
            element.child(&Label::Shape(Shape::INTEGER)).map(ComparisonResult::code),
            Some(Code::ClassMismatch)
        );
    }
}
