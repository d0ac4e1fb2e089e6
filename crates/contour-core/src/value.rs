//! # Value Model
//!
//! The runtime data checked against shapes: scalars, ordered sequences and
//! keyed maps, nested arbitrarily. Values are never mutated by the engine.
//!
//! ## Equality
//!
//! Equality is structural and total so that `Value` can implement `Eq` and
//! `Hash`:
//!
//! - Floats compare by `f64::total_cmp` (`NaN == NaN`, `0.0 != -0.0`).
//! - Integers and floats are different values: `Int(1) != Float(1.0)`.
//! - Map equality ignores entry order, like set-of-pairs equality.
//!
//! ## Rendering
//!
//! `Display` renders values as compact literals used by the diagnostic
//! trace: `nil`, `1`, `1.5`, `"text"`, `:symbol`, `[1, 2]`,
//! `{name: "x", "key" => 1}` and `:$undefined` for the absence marker.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A value checked by the matching engine.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null / nil value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A symbolic name, distinct from a string with the same text.
    Sym(String),
    /// Marker for "key absent from a map". Produced only by the engine.
    Undefined,
    /// An ordered sequence.
    Seq(Vec<Value>),
    /// A keyed map.
    Map(ValueMap),
}

/// Runtime category of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Str`]
    Str,
    /// [`Value::Sym`]
    Sym,
    /// [`Value::Undefined`]
    Undefined,
    /// [`Value::Seq`]
    Seq,
    /// [`Value::Map`]
    Map,
}

impl ValueKind {
    /// Human-readable category name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Int => "an integer",
            Self::Float => "a float",
            Self::Str => "a string",
            Self::Sym => "a symbol",
            Self::Undefined => "the undefined marker",
            Self::Seq => "a sequence",
            Self::Map => "a map",
        }
    }

    /// Whether values of this category contain other values.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Seq | Self::Map)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Build a symbol value.
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Sym(name.into())
    }

    /// Build a string value.
    pub fn string(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    /// Build a sequence from anything convertible into values.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from key/value pairs. Later duplicates replace earlier ones.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(entries.into_iter().collect())
    }

    /// The runtime category of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Sym(_) => ValueKind::Sym,
            Self::Undefined => ValueKind::Undefined,
            Self::Seq(_) => ValueKind::Seq,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Whether this value is a sequence or a map.
    pub fn is_collection(&self) -> bool {
        self.kind().is_collection()
    }

    /// Whether this is the absence marker.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The symbol name, if this is a symbol.
    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Self::Sym(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is a sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Ordering between comparable scalars.
    ///
    /// Integers and floats compare numerically with each other; strings and
    /// symbols compare lexically within their own category. Every other
    /// pairing is incomparable.
    pub fn scalar_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => int_float_cmp(*a, *b),
            (Self::Float(a), Self::Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Str(a), Self::Str(b)) | (Self::Sym(a), Self::Sym(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Literal rendering used by diagnostics. Same as `to_string()`.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`.
fn int_float_cmp(int: i64, float: f64) -> Option<Ordering> {
    // 2^63: the first float above every i64. -2^63 is i64::MIN exactly.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= I64_END {
        return Some(Ordering::Less);
    }
    if float < -I64_END {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        unequal => Some(unequal),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b) == Ordering::Equal,
            (Self::Str(a), Self::Str(b)) | (Self::Sym(a), Self::Sym(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null | Self::Undefined => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(x) => x.to_bits().hash(state),
            Self::Str(s) | Self::Sym(s) => s.hash(state),
            Self::Seq(items) => items.hash(state),
            Self::Map(map) => map.hash(state),
        }
    }
}

// ---------------------------------------------------------------------------
// ValueMap
// ---------------------------------------------------------------------------

/// Insertion-ordered keyed map with arbitrary value keys.
///
/// Inserting an existing key replaces its value in place and keeps the
/// original position. Lookups are linear; maps checked against shapes are
/// small and every comparison visits all entries anyway.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous value if the key existed.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for ValueMap {}

impl Hash for ValueMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entry hashes are summed so the result does not depend on order.
        let combined = self.entries.iter().fold(0u64, |acc, (k, v)| {
            let mut hasher = DefaultHasher::new();
            k.hash(&mut hasher);
            v.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        state.write_usize(self.entries.len());
        state.write_u64(combined);
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k.into(), v.into());
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = &'a (Value, Value);
    type IntoIter = std::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Conversions from Rust literals
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Whether a symbol can be written bare (`:name`, `name:`) without quoting.
pub fn is_plain_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn fmt_symbol(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let bare = name.strip_prefix('$').unwrap_or(name);
    if is_plain_symbol(bare) {
        write!(f, ":{name}")
    } else {
        write!(f, ":{name:?}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Sym(s) => fmt_symbol(f, s),
            Self::Undefined => f.write_str(":$undefined"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => write!(f, "{map}"),
        }
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match k {
                Value::Sym(name) if is_plain_symbol(name) => write!(f, "{name}: {v}")?,
                other => write!(f, "{other} => {v}")?,
            }
        }
        f.write_str("}")
    }
}
