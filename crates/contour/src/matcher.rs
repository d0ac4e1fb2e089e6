//! # General Matchers
//!
//! Shapes that accept a family of values rather than one literal: type
//! matchers, regular-expression patterns, ranges and predicates. As map keys
//! these are "general" (wildcard) entries and never count as required keys.

use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use contour_core::{ContourError, Value};
use regex::Regex;

/// Class-style type matcher.
///
/// `Array` and `Hash` double as the "any sequence" and "any map" sentinels
/// recognised by the collection comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `nil`.
    Null,
    /// `true` or `false`.
    Boolean,
    /// Integers.
    Integer,
    /// Floats.
    Float,
    /// Integers and floats.
    Numeric,
    /// Strings, not symbols.
    String,
    /// Symbols, not the key-absent marker.
    Symbol,
    /// Any sequence.
    Array,
    /// Any map.
    Hash,
}

impl Kind {
    /// Whether a value belongs to this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Null => matches!(value, Value::Null),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Integer => matches!(value, Value::Int(_)),
            Self::Float => matches!(value, Value::Float(_)),
            Self::Numeric => matches!(value, Value::Int(_) | Value::Float(_)),
            Self::String => matches!(value, Value::Str(_)),
            Self::Symbol => matches!(value, Value::Sym(_)),
            Self::Array => matches!(value, Value::Seq(_)),
            Self::Hash => matches!(value, Value::Map(_)),
        }
    }

    /// Type name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "NilClass",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Numeric => "Numeric",
            Self::String => "String",
            Self::Symbol => "Symbol",
            Self::Array => "Array",
            Self::Hash => "Hash",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled regular expression. Accepts strings and symbols whose text
/// contains a match; anchor the expression to require a full match.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::InvalidPattern` if the expression is malformed.
    pub fn new(source: &str) -> Result<Self, ContourError> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| ContourError::InvalidPattern(e.to_string()))
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The compiled expression.
    pub fn regex(&self) -> &Regex {
        &self.0
    }

    /// Whether a string or symbol contains a match.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Str(text) | Value::Sym(text) => self.0.is_match(text),
            _ => false,
        }
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

/// A range over comparable scalars.
///
/// Integers and floats compare numerically with each other; strings and
/// symbols compare lexically within their own category. Values that are not
/// comparable with a bound are outside the range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeShape {
    start: Bound<Value>,
    end: Bound<Value>,
}

fn owned_bound<T: Clone + Into<Value>>(bound: Bound<&T>) -> Bound<Value> {
    match bound {
        Bound::Included(v) => Bound::Included(v.clone().into()),
        Bound::Excluded(v) => Bound::Excluded(v.clone().into()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

impl RangeShape {
    /// A range between two explicit bounds.
    pub fn new(start: Bound<Value>, end: Bound<Value>) -> Self {
        Self { start, end }
    }

    /// Build from any standard range, e.g. `1..=10` or `"a".."n"`.
    pub fn from_bounds<T, R>(range: R) -> Self
    where
        T: Clone + Into<Value>,
        R: RangeBounds<T>,
    {
        Self {
            start: owned_bound(range.start_bound()),
            end: owned_bound(range.end_bound()),
        }
    }

    /// Lower bound.
    pub fn start(&self) -> &Bound<Value> {
        &self.start
    }

    /// Upper bound.
    pub fn end(&self) -> &Bound<Value> {
        &self.end
    }

    /// Whether `value` lies within both bounds.
    pub fn contains(&self, value: &Value) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};

        // Unbounded on both ends still demands an orderable scalar.
        if value.scalar_cmp(value).is_none() {
            return false;
        }
        let above_start = match &self.start {
            Bound::Included(s) => matches!(value.scalar_cmp(s), Some(Greater | Equal)),
            Bound::Excluded(s) => matches!(value.scalar_cmp(s), Some(Greater)),
            Bound::Unbounded => true,
        };
        let below_end = match &self.end {
            Bound::Included(e) => matches!(value.scalar_cmp(e), Some(Less | Equal)),
            Bound::Excluded(e) => matches!(value.scalar_cmp(e), Some(Less)),
            Bound::Unbounded => true,
        };
        above_start && below_end
    }
}

impl fmt::Display for RangeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Bound::Included(s) => write!(f, "{s}")?,
            Bound::Excluded(s) => write!(f, "{s}<")?,
            Bound::Unbounded => {}
        }
        match &self.end {
            Bound::Included(e) => write!(f, "..{e}"),
            Bound::Excluded(e) => write!(f, "...{e}"),
            Bound::Unbounded => f.write_str(".."),
        }
    }
}

/// A named test applied to the whole value, collections included.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    /// A predicate shown as `name` in diagnostics.
    pub fn new(name: impl Into<String>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Name shown in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the test.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.test, &other.test)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Predicate {}>", self.name)
    }
}

/// A general matcher: accepts values through a test rather than equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Type membership.
    Kind(Kind),
    /// Regular-expression search on strings and symbols.
    Pattern(Pattern),
    /// Bounds on comparable scalars.
    Range(RangeShape),
    /// Arbitrary named test.
    Predicate(Predicate),
}

impl Matcher {
    /// Whether this matcher accepts `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Kind(kind) => kind.accepts(value),
            Self::Pattern(pattern) => pattern.accepts(value),
            Self::Range(range) => range.contains(value),
            Self::Predicate(predicate) => predicate.accepts(value),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::Pattern(pattern) => write!(f, "{pattern}"),
            Self::Range(range) => write!(f, "{range}"),
            Self::Predicate(predicate) => write!(f, "{predicate}"),
        }
    }
}
