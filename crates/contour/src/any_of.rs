//! # AnyOf Combinator
//!
//! `AnyOf[S1, ..., Sn]` matches a value when at least one sub-shape does.
//! Every sub-shape is compared (no short-circuit) so the diagnostic tree
//! shows why each alternative did or did not apply.
//!
//! Combined with [`Shape::Undefined`] it expresses optional map keys:
//! `{name: AnyOf[String, :$undefined]}`.

use std::fmt;

use contour_core::{ContourError, Value};

use crate::code::Code;
use crate::compare::Scope;
use crate::result::{ComparisonResult, Label};
use crate::shape::{write_joined, Shape};

/// Disjunction of shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnyOf {
    shapes: Vec<Shape>,
}

impl AnyOf {
    /// Build from alternatives, keeping their order.
    pub fn new<I, T>(shapes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Shape>,
    {
        Self {
            shapes: shapes.into_iter().map(Into::into).collect(),
        }
    }

    /// The alternatives in declaration order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Iterate over the alternatives.
    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether there are no alternatives. An empty `AnyOf` matches nothing.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Compare `value` against every alternative.
    ///
    /// Children are labelled by sub-shape; a sub-shape listed twice is
    /// compared once. An empty `AnyOf` matches nothing.
    pub fn compare(&self, value: &Value, scope: &Scope<'_>) -> Result<ComparisonResult, ContourError> {
        let mut children: Vec<(Label, ComparisonResult)> = Vec::with_capacity(self.shapes.len());
        for (i, sub_shape) in self.shapes.iter().enumerate() {
            if self.shapes[..i].contains(sub_shape) {
                continue;
            }
            let result = scope.compare(value, sub_shape)?;
            children.push((Label::Shape(sub_shape.clone()), result));
        }
        let code = if children.iter().any(|(_, r)| r.is_match()) {
            Code::AnyOfMatch
        } else {
            Code::AnyOfMismatch
        };
        Ok(ComparisonResult::branch(
            value.clone(),
            Shape::AnyOf(self.clone()),
            code,
            children,
        ))
    }
}

impl<'a> IntoIterator for &'a AnyOf {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

impl<T: Into<Shape>> FromIterator<T> for AnyOf {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyOf[")?;
        write_joined(f, &self.shapes)?;
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Comparator;
    use crate::registry::ShapeRegistry;
    use std::sync::Arc;

    fn comparator() -> Comparator {
        Comparator::new(Arc::new(ShapeRegistry::with_builtins()))
    }

    #[test]
    fn iterates_sub_shapes_in_order() {
        let any_of = AnyOf::new([Shape::INTEGER, Shape::STRING]);
        let collected: Vec<&Shape> = any_of.iter().collect();
        assert_eq!(collected, vec![&Shape::INTEGER, &Shape::STRING]);
        assert_eq!(any_of.to_string(), "AnyOf[Integer, String]");
    }

    #[test]
    fn matches_when_any_alternative_matches() {
        let shape = Shape::any_of([Shape::INTEGER, Shape::STRING]);
        let result = comparator().compare(&Value::from("x"), &shape).unwrap();
        assert_eq!(result.code(), Code::AnyOfMatch);
        let children = result.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children.get(&Label::Shape(Shape::INTEGER)).map(ComparisonResult::code),
            Some(Code::Mismatch)
        );
        assert_eq!(
            children.get(&Label::Shape(Shape::STRING)).map(ComparisonResult::code),
            Some(Code::Match)
        );
    }

    #[test]
    fn mismatches_when_no_alternative_matches() {
        let shape = Shape::any_of([Shape::INTEGER, Shape::Undefined]);
        let result = comparator().compare(&Value::Null, &shape).unwrap();
        assert_eq!(result.code(), Code::AnyOfMismatch);
    }

    #[test]
    fn empty_any_of_matches_nothing() {
        let result = comparator()
            .compare(&Value::Int(1), &Shape::AnyOf(AnyOf::default()))
            .unwrap();
        assert_eq!(result.code(), Code::AnyOfMismatch);
        assert!(result.is_leaf());
    }

    #[test]
    fn duplicate_alternatives_are_compared_once() {
        let shape = Shape::any_of([Shape::INTEGER, Shape::INTEGER]);
        let result = comparator().compare(&Value::Int(1), &shape).unwrap();
        assert_eq!(result.children().map(|c| c.len()), Some(1));
    }

    #[test]
    fn alternatives_resolve_named_shapes() {
        let shape = Shape::any_of([Shape::sym("$uuid"), Shape::NIL]);
        let c = comparator();
        assert!(c.compare(&Value::Null, &shape).unwrap().is_match());
        assert!(c
            .compare(&Value::from("123e4567-e89b-12d3-a456-426614174000"), &shape)
            .unwrap()
            .is_match());
        assert!(!c.compare(&Value::from("nope"), &shape).unwrap().is_match());
    }
}
