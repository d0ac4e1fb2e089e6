//! # Comparison Engine
//!
//! The dispatcher at the heart of contour: resolve the shape, then route the
//! value to the scalar, sequence or map comparator. Collection comparators
//! call back into the dispatcher for every element, key and value, so a
//! single comparison is a tree recursion whose shape mirrors the data.
//!
//! ## Dispatch order
//!
//! 1. Named shapes are resolved through the [`ShapeRegistry`].
//! 2. `AnyOf` and custom shapes compare the value themselves.
//! 3. The universal shape yields `object_universal_match`.
//! 4. Predicates always see the whole value (scalar comparator).
//! 5. Otherwise the value category decides: sequence, map or scalar.
//!
//! ## Depth guard
//!
//! Every nested call goes through [`Scope::compare`], which counts depth and
//! fails with `ContourError::DepthLimitExceeded` past the configured limit.
//! Each level of nested data costs one level of depth, as does each named
//! shape resolution.

pub mod map;
pub mod scalar;
pub mod sequence;

use std::borrow::Cow;
use std::sync::Arc;

use contour_core::{ContourError, Value};

use crate::config::CompareConfig;
use crate::matcher::Matcher;
use crate::registry::ShapeRegistry;
use crate::result::ComparisonResult;
use crate::shape::Shape;

/// Compares values against shapes using one registry and configuration.
#[derive(Debug, Clone)]
pub struct Comparator {
    registry: Arc<ShapeRegistry>,
    config: CompareConfig,
}

impl Comparator {
    /// A comparator with the default configuration.
    pub fn new(registry: Arc<ShapeRegistry>) -> Self {
        Self::with_config(registry, CompareConfig::default())
    }

    /// A comparator with explicit configuration.
    pub fn with_config(registry: Arc<ShapeRegistry>, config: CompareConfig) -> Self {
        Self { registry, config }
    }

    /// A comparator over the process-wide registry.
    pub fn global() -> Self {
        Self::new(ShapeRegistry::global())
    }

    /// The registry used to resolve named shapes.
    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    fn root(&self) -> Scope<'_> {
        Scope {
            comparator: self,
            depth: 0,
        }
    }

    /// Compare a value against a shape.
    ///
    /// A mismatch is an `Ok` result with a non-matching code.
    ///
    /// # Errors
    ///
    /// - `ContourError::UnknownShape` if the shape references an unregistered name.
    /// - `ContourError::DepthLimitExceeded` if recursion passes the configured limit.
    pub fn compare(&self, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
        self.root().compare(value, shape)
    }

    /// Run the scalar comparator directly.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::UnknownShape` for an unregistered named shape.
    pub fn compare_scalar(
        &self,
        value: &Value,
        shape: &Shape,
    ) -> Result<ComparisonResult, ContourError> {
        let scope = self.root();
        let shape = scope.resolve_fully(shape)?;
        Ok(scalar::compare(value, &shape))
    }

    /// Run the sequence comparator directly.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::TypeMismatch` if `value` is not a sequence.
    pub fn compare_sequence(
        &self,
        value: &Value,
        shape: &Shape,
    ) -> Result<ComparisonResult, ContourError> {
        let scope = self.root();
        let shape = scope.resolve_fully(shape)?;
        sequence::compare(&scope, value, &shape)
    }

    /// Run the map comparator directly.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::TypeMismatch` if `value` is not a map.
    pub fn compare_map(&self, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
        let scope = self.root();
        let shape = scope.resolve_fully(shape)?;
        map::compare(&scope, value, &shape)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::global()
    }
}

/// Recursion state of one comparison.
///
/// Handed to [`crate::CustomShape::compare`] so custom shapes can compare
/// nested values with the same registry and depth budget.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    comparator: &'a Comparator,
    depth: usize,
}

impl<'a> Scope<'a> {
    /// Number of enclosing comparison calls.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The registry of the comparator that opened this scope.
    pub fn registry(&self) -> &'a ShapeRegistry {
        &self.comparator.registry
    }

    /// Compare a nested value, one level deeper.
    ///
    /// # Errors
    ///
    /// Propagates registry and depth-limit errors.
    pub fn compare(&self, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
        self.descend()?.dispatch(value, shape)
    }

    pub(crate) fn descend(&self) -> Result<Scope<'a>, ContourError> {
        let limit = self.comparator.config.max_depth;
        if self.depth >= limit {
            tracing::warn!(limit, "comparison depth limit exceeded; is a named shape cyclic?");
            return Err(ContourError::DepthLimitExceeded { limit });
        }
        Ok(Scope {
            comparator: self.comparator,
            depth: self.depth + 1,
        })
    }

    /// Resolve named shapes until a concrete shape remains, and lift literal
    /// collections into structural shapes.
    pub(crate) fn resolve_fully<'s>(&self, shape: &'s Shape) -> Result<Cow<'s, Shape>, ContourError> {
        let mut current = self.registry().resolve(shape)?;
        let mut scope = *self;
        while let Shape::Named(_) = current.as_ref() {
            scope = scope.descend()?;
            let next = self.registry().resolve(current.as_ref())?.into_owned();
            current = Cow::Owned(next);
        }
        if let Shape::Literal(literal) = current.as_ref() {
            if literal.is_collection() {
                return Ok(Cow::Owned(Shape::from(literal.clone())));
            }
        }
        Ok(current)
    }

    fn dispatch(&self, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
        let shape = self.resolve_fully(shape)?;
        trace_dispatch(self.depth, &shape, value);
        match shape.as_ref() {
            Shape::AnyOf(any_of) => any_of.compare(value, self),
            Shape::Custom(custom) => custom.compare(value, self),
            Shape::Anything => Ok(scalar::universal(value)),
            Shape::Matcher(Matcher::Predicate(_)) => Ok(scalar::compare(value, &shape)),
            concrete => match value {
                Value::Seq(_) => sequence::compare(self, value, concrete),
                Value::Map(_) => map::compare(self, value, concrete),
                _ => Ok(scalar::compare(value, concrete)),
            },
        }
    }
}

// Out of line to keep `dispatch` frames small.
#[inline(never)]
fn trace_dispatch(depth: usize, shape: &Shape, value: &Value) {
    tracing::trace!(depth, shape = shape.kind_name(), value = %value.kind(), "compare");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;
    use crate::config::DEFAULT_MAX_DEPTH;
    use crate::shape::CustomShape;

    fn comparator() -> Comparator {
        Comparator::new(Arc::new(ShapeRegistry::with_builtins()))
    }

    #[test]
    fn universal_shape_accepts_everything() {
        let c = comparator();
        for value in [Value::Null, Value::Undefined, Value::seq([1]), Value::map([(1, 2)])] {
            assert_eq!(c.compare(&value, &Shape::OBJECT).unwrap().code(), Code::ObjectUniversalMatch);
        }
    }

    #[test]
    fn named_shapes_resolve_before_dispatch() {
        let registry = Arc::new(ShapeRegistry::new());
        registry.register("$ints", Shape::seq([Shape::INTEGER])).unwrap();
        registry.register("$alias", Shape::sym("$ints")).unwrap();
        let c = Comparator::new(registry);
        let result = c.compare(&Value::seq([1, 2]), &Shape::sym("$alias")).unwrap();
        assert_eq!(result.code(), Code::SequenceMatch);
        assert_eq!(result.shape(), &Shape::seq([Shape::INTEGER]));
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = comparator().compare(&Value::Int(1), &Shape::sym("$missing")).unwrap_err();
        assert_eq!(err, ContourError::UnknownShape("$missing".to_string()));
    }

    #[test]
    fn cyclic_shapes_hit_the_depth_limit() {
        let registry = Arc::new(ShapeRegistry::new());
        registry.register("$loop", Shape::sym("$loop")).unwrap();
        let c = Comparator::with_config(registry, CompareConfig::with_max_depth(16));
        let err = c.compare(&Value::Int(1), &Shape::sym("$loop")).unwrap_err();
        assert_eq!(err, ContourError::DepthLimitExceeded { limit: 16 });
    }

    #[test]
    fn deep_but_finite_nesting_is_fine() {
        let mut value = Value::Int(1);
        let mut shape = Shape::INTEGER;
        for _ in 0..20 {
            value = Value::seq([value]);
            shape = Shape::seq([shape]);
        }
        let c = Comparator::with_config(Arc::new(ShapeRegistry::new()), CompareConfig::with_max_depth(64));
        assert!(c.compare(&value, &shape).unwrap().is_match());
        let shallow = Comparator::with_config(Arc::new(ShapeRegistry::new()), CompareConfig::with_max_depth(8));
        assert!(matches!(
            shallow.compare(&value, &shape),
            Err(ContourError::DepthLimitExceeded { limit: 8 })
        ));
    }

    fn nested_wildcard_maps(levels: usize) -> (Value, Shape) {
        let mut value = Value::Int(1);
        let mut shape = Shape::INTEGER;
        for _ in 0..levels {
            value = Value::map([(Value::sym("k"), value)]);
            shape = Shape::map([(Shape::SYMBOL, shape)]);
        }
        (value, shape)
    }

    #[test]
    fn nesting_just_under_the_default_limit_matches() {
        let (value, shape) = nested_wildcard_maps(DEFAULT_MAX_DEPTH - 1);
        let result = comparator().compare(&value, &shape).unwrap();
        assert_eq!(result.code(), Code::MapMatch);
    }

    #[test]
    fn nesting_past_the_default_limit_is_an_error() {
        let (value, shape) = nested_wildcard_maps(DEFAULT_MAX_DEPTH + 8);
        assert_eq!(
            comparator().compare(&value, &shape).unwrap_err(),
            ContourError::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH }
        );
    }

    #[test]
    fn predicates_see_whole_collections() {
        let short = Shape::predicate("short", |v| v.as_seq().is_some_and(|items| items.len() < 3));
        let c = comparator();
        assert_eq!(c.compare(&Value::seq([1, 2]), &short).unwrap().code(), Code::Match);
        assert_eq!(c.compare(&Value::seq([1, 2, 3]), &short).unwrap().code(), Code::Mismatch);
    }

    #[test]
    fn literal_collections_are_lifted() {
        let shape = Shape::Literal(Value::seq([Value::sym("$uuid")]));
        let result = comparator()
            .compare(&Value::seq(["123e4567-e89b-12d3-a456-426614174000"]), &shape)
            .unwrap();
        assert_eq!(result.code(), Code::SequenceMatch);
    }

    #[test]
    fn direct_entry_points_check_value_category() {
        let c = comparator();
        assert!(matches!(
            c.compare_sequence(&Value::Int(1), &Shape::ARRAY),
            Err(ContourError::TypeMismatch { expected: "a sequence", found: "an integer" })
        ));
        assert!(matches!(
            c.compare_map(&Value::seq([1]), &Shape::HASH),
            Err(ContourError::TypeMismatch { expected: "a map", found: "a sequence" })
        ));
        assert_eq!(c.compare_scalar(&Value::Int(1), &Shape::from(1)).unwrap().code(), Code::ExactMatch);
    }

    #[derive(Debug)]
    struct EvenLength;

    impl CustomShape for EvenLength {
        fn compare(&self, value: &Value, scope: &Scope<'_>) -> Result<ComparisonResult, ContourError> {
            let text = scope.compare(value, &Shape::STRING)?;
            let even = value.as_str().is_some_and(|s| s.len() % 2 == 0);
            let code = if text.is_match() && even { Code::Match } else { Code::Mismatch };
            Ok(ComparisonResult::leaf(value.clone(), Shape::custom(EvenLength), code))
        }

        fn describe(&self) -> String {
            "EvenLength".to_string()
        }
    }

    #[test]
    fn custom_shapes_delegate_and_see_depth() {
        let c = comparator();
        let shape = Shape::custom(EvenLength);
        assert_eq!(c.compare(&Value::from("ab"), &shape).unwrap().code(), Code::Match);
        assert_eq!(c.compare(&Value::from("abc"), &shape).unwrap().code(), Code::Mismatch);
        let inside = c.compare(&Value::seq(["ab", "cd"]), &Shape::seq([shape])).unwrap();
        assert_eq!(inside.code(), Code::SequenceMatch);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::code::Code;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z]{0,6}".prop_map(Value::Str),
            "[a-z]{1,6}".prop_map(Value::Sym),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
                prop::collection::vec((inner.clone(), inner), 0..4)
                    .prop_map(|pairs| Value::Map(pairs.into_iter().collect())),
            ]
        })
    }

    fn arb_shape() -> impl Strategy<Value = Shape> {
        prop_oneof![
            Just(Shape::INTEGER),
            Just(Shape::STRING),
            Just(Shape::SYMBOL),
            Just(Shape::ARRAY),
            Just(Shape::HASH),
            Just(Shape::NIL),
            Just(Shape::seq([Shape::INTEGER, Shape::STRING])),
            Just(Shape::map([(Shape::SYMBOL, Shape::OBJECT)])),
            arb_value().prop_map(Shape::from),
        ]
    }

    fn comparator() -> Comparator {
        Comparator::new(Arc::new(ShapeRegistry::with_builtins()))
    }

    proptest! {
        /// Comparing twice yields the same tree.
        #[test]
        fn comparison_is_idempotent(value in arb_value(), shape in arb_shape()) {
            let c = comparator();
            let first = c.compare(&value, &shape).unwrap();
            let second = c.compare(&value, &shape).unwrap();
            prop_assert_eq!(first.code(), second.code());
            prop_assert_eq!(first, second);
        }

        /// Every node's verdict is the verdict of its own code.
        #[test]
        fn match_status_follows_code(value in arb_value(), shape in arb_shape()) {
            let result = comparator().compare(&value, &shape).unwrap();
            for node in result.descendants() {
                prop_assert_eq!(node.is_match(), node.code().is_match());
            }
        }

        /// A value compared with itself is an exact match of its category.
        #[test]
        fn self_comparison_is_exact(value in arb_value()) {
            let result = comparator().compare(&value, &Shape::from(value.clone())).unwrap();
            let expected = match value {
                Value::Seq(_) => Code::SequenceExactMatch,
                Value::Map(_) => Code::MapExactMatch,
                _ => Code::ExactMatch,
            };
            prop_assert_eq!(result.code(), expected);
        }

        /// The universal shape accepts every value.
        #[test]
        fn universal_shape_accepts_all(value in arb_value()) {
            let result = comparator().compare(&value, &Shape::OBJECT).unwrap();
            prop_assert_eq!(result.code(), Code::ObjectUniversalMatch);
        }

        /// AnyOf matches exactly when one of its alternatives matches.
        #[test]
        fn any_of_is_a_disjunction(
            value in arb_value(),
            shapes in prop::collection::vec(arb_shape(), 1..4),
        ) {
            let c = comparator();
            let expected = shapes
                .iter()
                .map(|s| c.compare(&value, s).map(|r| r.is_match()))
                .collect::<Result<Vec<bool>, _>>()
                .unwrap()
                .into_iter()
                .any(|m| m);
            let combined = c.compare(&value, &Shape::any_of(shapes)).unwrap();
            prop_assert_eq!(combined.is_match(), expected);
        }

        /// An empty sequence fits any non-empty sequence shape.
        #[test]
        fn empty_sequence_always_matches(shapes in prop::collection::vec(arb_shape(), 1..4)) {
            let result = comparator()
                .compare(&Value::Seq(Vec::new()), &Shape::Seq(shapes))
                .unwrap();
            prop_assert_eq!(result.code(), Code::SequenceEmpty);
        }
    }
}
