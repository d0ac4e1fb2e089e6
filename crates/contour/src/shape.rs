//! # Shape Model
//!
//! A [`Shape`] is the declarative description a value is checked against.
//! Shapes are built directly in memory, nest arbitrarily, and are never
//! mutated by a comparison.
//!
//! ## Variants
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Literal` | a scalar matched by equality |
//! | `Matcher` | type, pattern, range or predicate ([`Matcher`]) |
//! | `Seq` | every value element must match at least one sub-shape |
//! | `Map` | required keys, no extra keys, compatible values |
//! | `Named` | a `$name` reference resolved through the registry |
//! | `Undefined` | the key-absent marker, used to express optional keys |
//! | `AnyOf` | matches when any sub-shape matches |
//! | `Anything` | accepts every value |
//! | `Custom` | delegates to a [`CustomShape`] hook |
//!
//! ## Symbolic names
//!
//! Converting a `$`-prefixed symbol into a shape yields a registry
//! reference, and `$undefined` yields [`Shape::Undefined`]. The distinction
//! is made once at construction, not by inspecting strings while comparing.

use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use contour_core::{is_plain_symbol, ContourError, Value};
use regex::Regex;

use crate::any_of::AnyOf;
use crate::compare::Scope;
use crate::matcher::{Kind, Matcher, Pattern, Predicate, RangeShape};
use crate::result::ComparisonResult;

/// Reserved name of the key-absent marker.
pub const UNDEFINED_KEY: &str = "$undefined";

/// Sigil that starts every registrable shape name.
pub const SHAPE_SIGIL: char = '$';

/// Comparison hook for user-defined shapes.
///
/// The dispatcher hands the value straight to [`CustomShape::compare`] and
/// returns its result unchanged. Nested comparisons must go through the
/// supplied [`Scope`] so registry lookups and the depth limit keep working.
pub trait CustomShape: fmt::Debug + Send + Sync {
    /// Compare `value` against this shape.
    ///
    /// # Errors
    ///
    /// Errors from nested [`Scope::compare`] calls should be propagated.
    fn compare(&self, value: &Value, scope: &Scope<'_>) -> Result<ComparisonResult, ContourError>;

    /// Rendering used in diagnostics.
    fn describe(&self) -> String {
        format!("{self:?}")
    }

    /// Whether this shape, used as a map key, must be present in the value.
    fn is_required_key(&self) -> bool {
        true
    }
}

/// A declarative description of acceptable values.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A scalar or collection accepted by equality.
    Literal(Value),
    /// A general matcher accepted by test.
    Matcher(Matcher),
    /// Element alternatives for sequences.
    Seq(Vec<Shape>),
    /// Key/value shapes for maps.
    Map(ShapeMap),
    /// Reference to a registered shape, e.g. `$uuid`.
    Named(String),
    /// The key-absent marker.
    Undefined,
    /// Disjunction of shapes.
    AnyOf(AnyOf),
    /// Accepts every value.
    Anything,
    /// User-defined comparison.
    Custom(Arc<dyn CustomShape>),
}

impl Shape {
    /// `nil` only.
    pub const NIL: Shape = Shape::Matcher(Matcher::Kind(Kind::Null));
    /// Either boolean.
    pub const BOOLEAN: Shape = Shape::Matcher(Matcher::Kind(Kind::Boolean));
    /// Any integer.
    pub const INTEGER: Shape = Shape::Matcher(Matcher::Kind(Kind::Integer));
    /// Any float.
    pub const FLOAT: Shape = Shape::Matcher(Matcher::Kind(Kind::Float));
    /// Any integer or float.
    pub const NUMERIC: Shape = Shape::Matcher(Matcher::Kind(Kind::Numeric));
    /// Any string.
    pub const STRING: Shape = Shape::Matcher(Matcher::Kind(Kind::String));
    /// Any symbol.
    pub const SYMBOL: Shape = Shape::Matcher(Matcher::Kind(Kind::Symbol));
    /// Any sequence.
    pub const ARRAY: Shape = Shape::Matcher(Matcher::Kind(Kind::Array));
    /// Any map.
    pub const HASH: Shape = Shape::Matcher(Matcher::Kind(Kind::Hash));
    /// Any value at all.
    pub const OBJECT: Shape = Shape::Anything;
    /// The key-absent marker; with `AnyOf` it makes a map key optional.
    pub const UNDEFINED: Shape = Shape::Undefined;

    /// Shape for a literal value. Collections are lifted into `Seq` / `Map`
    /// shapes and `$`-prefixed symbols become registry references.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from(value.into())
    }

    /// Shape for a symbol; `Shape::sym("$uuid")` references a registered shape.
    pub fn sym(name: impl Into<String>) -> Self {
        Self::from(Value::Sym(name.into()))
    }

    /// Reference to a registered shape.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == UNDEFINED_KEY {
            Self::Undefined
        } else {
            Self::Named(name)
        }
    }

    /// Sequence shape: every element must match one of `items`.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Shape>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Map shape from key/value shape pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Shape>,
        V: Into<Shape>,
    {
        Self::Map(entries.into_iter().collect())
    }

    /// Compile a regular-expression shape.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::InvalidPattern` if the expression is malformed.
    pub fn pattern(source: &str) -> Result<Self, ContourError> {
        Ok(Self::Matcher(Matcher::Pattern(Pattern::new(source)?)))
    }

    /// Range shape from any standard range.
    pub fn range<T, R>(range: R) -> Self
    where
        T: Clone + Into<Value>,
        R: RangeBounds<T>,
    {
        Self::Matcher(Matcher::Range(RangeShape::from_bounds(range)))
    }

    /// Predicate shape, applied to the whole value.
    pub fn predicate(
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Matcher(Matcher::Predicate(Predicate::new(name, test)))
    }

    /// Shape accepting what any of `shapes` accepts.
    pub fn any_of<I, T>(shapes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Shape>,
    {
        Self::AnyOf(AnyOf::new(shapes))
    }

    /// Wrap a user-defined shape.
    pub fn custom(shape: impl CustomShape + 'static) -> Self {
        Self::Custom(Arc::new(shape))
    }

    /// Short variant name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Matcher(_) => "matcher",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
            Self::Named(_) => "named",
            Self::Undefined => "undefined",
            Self::AnyOf(_) => "any_of",
            Self::Anything => "anything",
            Self::Custom(_) => "custom",
        }
    }

    /// Deep equality between a shape and a value.
    ///
    /// Literals compare by value equality, sequence and map shapes compare
    /// structurally (maps ignoring entry order) and `Undefined` equals only
    /// the absence marker. General matchers never equal a value.
    pub fn equals_value(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Literal(literal), _) => literal == value,
            (Self::Seq(shapes), Value::Seq(items)) => {
                shapes.len() == items.len()
                    && shapes.iter().zip(items).all(|(s, v)| s.equals_value(v))
            }
            (Self::Map(shape_map), Value::Map(entries)) => {
                shape_map.len() == entries.len()
                    && entries.iter().all(|(k, v)| {
                        shape_map
                            .find_exact(k)
                            .is_some_and(|(_, s_value)| s_value.equals_value(v))
                    })
            }
            (Self::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }

    /// The non-recursive "does this shape accept that value" relation used
    /// by the scalar comparator: matcher tests, equality for everything else.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Matcher(matcher) => matcher.accepts(value),
            Self::Anything => true,
            other => other.equals_value(value),
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Matcher(a), Self::Matcher(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::AnyOf(a), Self::AnyOf(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            (Self::Undefined, Self::Undefined) | (Self::Anything, Self::Anything) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ShapeMap
// ---------------------------------------------------------------------------

/// Insertion-ordered map of shape keys to shape values.
#[derive(Debug, Clone, Default)]
pub struct ShapeMap {
    entries: Vec<(Shape, Shape)>,
}

impl ShapeMap {
    /// An empty map shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding one entry.
    pub fn single(key: Shape, value: Shape) -> Self {
        Self {
            entries: vec![(key, value)],
        }
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: Shape, value: Shape) -> Option<Shape> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// The shape value under a shape key.
    pub fn get(&self, key: &Shape) -> Option<&Shape> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The entry whose key is exactly equal to a value key, if any.
    pub fn find_exact(&self, key: &Value) -> Option<(&Shape, &Shape)> {
        self.entries
            .iter()
            .find(|(k, _)| k.equals_value(key))
            .map(|(k, v)| (k, v))
    }

    /// Shape keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Shape> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Shape values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &Shape> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Shape, Shape)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map shape has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for ShapeMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Into<Shape>, V: Into<Shape>> FromIterator<(K, V)> for ShapeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ShapeMap::new();
        for (k, v) in iter {
            map.insert(k.into(), v.into());
        }
        map
    }
}

impl<'a> IntoIterator for &'a ShapeMap {
    type Item = &'a (Shape, Shape);
    type IntoIter = std::slice::Iter<'a, (Shape, Shape)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        match value {
            Value::Sym(name) if name.starts_with(SHAPE_SIGIL) => Shape::named(name),
            Value::Undefined => Shape::Undefined,
            Value::Seq(items) => Shape::Seq(items.into_iter().map(Shape::from).collect()),
            Value::Map(entries) => Shape::Map(entries.into_iter().collect()),
            other => Shape::Literal(other),
        }
    }
}

macro_rules! literal_shape_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Shape {
                fn from(value: $ty) -> Self {
                    Shape::from(Value::from(value))
                }
            }
        )+
    };
}

literal_shape_from!(bool, i64, i32, u32, f64, &str, String);

impl<T: Into<Shape>> From<Vec<T>> for Shape {
    fn from(items: Vec<T>) -> Self {
        Shape::seq(items)
    }
}

impl From<Kind> for Shape {
    fn from(kind: Kind) -> Self {
        Shape::Matcher(Matcher::Kind(kind))
    }
}

impl From<Matcher> for Shape {
    fn from(matcher: Matcher) -> Self {
        Shape::Matcher(matcher)
    }
}

impl From<Regex> for Shape {
    fn from(regex: Regex) -> Self {
        Shape::Matcher(Matcher::Pattern(Pattern::from(regex)))
    }
}

impl From<AnyOf> for Shape {
    fn from(any_of: AnyOf) -> Self {
        Shape::AnyOf(any_of)
    }
}

impl From<ShapeMap> for Shape {
    fn from(map: ShapeMap) -> Self {
        Shape::Map(map)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Matcher(matcher) => write!(f, "{matcher}"),
            Self::Seq(shapes) => {
                f.write_str("[")?;
                write_joined(f, shapes)?;
                f.write_str("]")
            }
            Self::Map(map) => write!(f, "{map}"),
            Self::Named(name) => write!(f, "{}", Value::Sym(name.clone())),
            Self::Undefined => write!(f, "{}", Value::Undefined),
            Self::AnyOf(any_of) => write!(f, "{any_of}"),
            Self::Anything => f.write_str("Object"),
            Self::Custom(custom) => f.write_str(&custom.describe()),
        }
    }
}

pub(crate) fn write_joined(f: &mut fmt::Formatter<'_>, shapes: &[Shape]) -> fmt::Result {
    for (i, shape) in shapes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{shape}")?;
    }
    Ok(())
}

impl fmt::Display for ShapeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match k {
                Shape::Literal(Value::Sym(name)) if is_plain_symbol(name) => write!(f, "{name}: {v}")?,
                other => write!(f, "{other} => {v}")?,
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_lift_into_structural_shapes() {
        let shape = Shape::from(Value::map([(Value::sym("ids"), Value::seq([Value::sym("$uuid")]))]));
        let Shape::Map(map) = &shape else {
            panic!("expected a map shape, got {shape:?}");
        };
        assert_eq!(
            map.get(&Shape::sym("ids")),
            Some(&Shape::Seq(vec![Shape::Named("$uuid".to_string())]))
        );
    }

    #[test]
    fn undefined_symbol_becomes_the_marker() {
        assert_eq!(Shape::sym(UNDEFINED_KEY), Shape::Undefined);
        assert_eq!(Shape::named(UNDEFINED_KEY), Shape::Undefined);
        assert_eq!(Shape::from(Value::Undefined), Shape::Undefined);
        assert_eq!(Shape::sym("plain"), Shape::Literal(Value::sym("plain")));
    }

    #[test]
    fn equality_against_values() {
        assert!(Shape::from(1).equals_value(&Value::Int(1)));
        assert!(!Shape::INTEGER.equals_value(&Value::Int(1)));
        assert!(Shape::seq([1, 2]).equals_value(&Value::seq([1, 2])));
        assert!(!Shape::seq([1, 2]).equals_value(&Value::seq([2, 1])));
        let map = Shape::map([(Shape::sym("a"), 1), (Shape::sym("b"), 2)]);
        assert!(map.equals_value(&Value::map([(Value::sym("b"), 2), (Value::sym("a"), 1)])));
        assert!(!map.equals_value(&Value::map([(Value::sym("a"), 1)])));
        assert!(Shape::Undefined.equals_value(&Value::Undefined));
    }

    #[test]
    fn general_shapes_accept_without_equality() {
        assert!(Shape::STRING.accepts(&Value::from("x")));
        assert!(Shape::OBJECT.accepts(&Value::Undefined));
        assert!(!Shape::from("x").accepts(&Value::sym("x")));
    }

    #[test]
    fn shape_map_insert_replaces_and_ignores_order() {
        let mut map = ShapeMap::new();
        assert!(map.insert(Shape::sym("a"), Shape::INTEGER).is_none());
        assert_eq!(map.insert(Shape::sym("a"), Shape::STRING), Some(Shape::INTEGER));
        map.insert(Shape::SYMBOL, Shape::OBJECT);
        let reordered: ShapeMap = [(Shape::SYMBOL, Shape::OBJECT), (Shape::sym("a"), Shape::STRING)]
            .into_iter()
            .collect();
        assert_eq!(map, reordered);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn display_uses_literal_style() {
        let shape = Shape::map([
            (Shape::sym("id"), Shape::sym("$uuid")),
            (Shape::SYMBOL, Shape::any_of([Shape::STRING, Shape::NIL])),
            (Shape::from("tags"), Shape::seq([Shape::range(1..=3)])),
        ]);
        assert_eq!(
            shape.to_string(),
            r#"{id: :$uuid, Symbol => AnyOf[String, NilClass], "tags" => [1..3]}"#
        );
        assert_eq!(Shape::UNDEFINED.to_string(), ":$undefined");
        assert_eq!(Shape::OBJECT.to_string(), "Object");
    }
}
