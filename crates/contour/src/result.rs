//! # Comparison Results
//!
//! A [`ComparisonResult`] records one decision of the engine: the value that
//! was checked, the shape it was checked against, the outcome [`Code`] and,
//! for composite decisions, the labelled child results that led to it.
//!
//! ## Invariants
//!
//! - `is_match()` is a lookup on the node's own code. Children explain the
//!   decision but are never consulted to recompute it.
//! - A node either has no children or a non-empty, label-unique list of
//!   them. Duplicate labels are rejected with
//!   `ContourError::InvalidChildResults`.
//! - Nodes are immutable once built.
//!
//! ## Diagnostics
//!
//! `Display` renders the whole tree, one node per line, children indented by
//! two spaces:
//!
//! ```text
//! :sequence_mismatch <-- compare(value: [[1]], shape: [Integer])
//!   :sequence_element_mismatch <-- compare(value: [1], shape: [Integer]); child_label: [1]
//!     :class_mismatch <-- compare(value: [1], shape: Integer); child_label: Integer
//! ```

use std::fmt;

use contour_core::{ContourError, Value};
use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::shape::Shape;

/// Key of a child result within its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// A structural section such as `$required_keys`.
    Section(&'static str),
    /// A value-side label: a sequence element, a map key or a key/value pair.
    Value(Value),
    /// A shape-side label: a sub-shape, a shape key or a shape key/value pair.
    Shape(Shape),
}

impl Label {
    /// Child section holding required-key checks.
    pub const REQUIRED_KEYS: Label = Label::Section("$required_keys");
    /// Child section holding extra-key checks.
    pub const EXTRA_KEYS: Label = Label::Section("$extra_keys");
    /// Child section holding value checks.
    pub const VALUES: Label = Label::Section("$values");
    /// Key half of a general key/value check.
    pub const KV_KEY: Label = Label::Section("$kv_key");
    /// Value half of a general key/value check.
    pub const KV_VALUE: Label = Label::Section("$kv_value");
}

impl From<Value> for Label {
    fn from(value: Value) -> Self {
        Label::Value(value)
    }
}

impl From<Shape> for Label {
    fn from(shape: Shape) -> Self {
        Label::Shape(shape)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(name) => write!(f, ":{name}"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Shape(shape) => write!(f, "{shape}"),
        }
    }
}

/// Ordered, label-unique child results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Children {
    entries: Vec<(Label, ComparisonResult)>,
}

impl Children {
    fn from_entries(entries: Vec<(Label, ComparisonResult)>) -> Result<Self, ContourError> {
        for (i, (label, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == label) {
                return Err(ContourError::InvalidChildResults(format!(
                    "duplicate child label {label}"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The child stored under `label`.
    pub fn get(&self, label: &Label) -> Option<&ComparisonResult> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, result)| result)
    }

    /// Whether a child is stored under `label`.
    pub fn contains(&self, label: &Label) -> bool {
        self.get(label).is_some()
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.entries.iter().map(|(l, _)| l)
    }

    /// Child results in insertion order.
    pub fn results(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Label and result pairs in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Label, ComparisonResult)> {
        self.entries.iter()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for children attached to a result.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every child matched. Vacuously true.
    pub fn all_match(&self) -> bool {
        self.results().all(ComparisonResult::is_match)
    }

    /// Whether at least one child matched.
    pub fn any_match(&self) -> bool {
        self.results().any(ComparisonResult::is_match)
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a (Label, ComparisonResult);
    type IntoIter = std::slice::Iter<'a, (Label, ComparisonResult)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One node of the decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    value: Value,
    shape: Shape,
    code: Code,
    children: Option<Children>,
}

impl ComparisonResult {
    /// Build a result node.
    ///
    /// An empty child list is stored as "no children".
    ///
    /// # Errors
    ///
    /// Returns `ContourError::InvalidChildResults` if two children share a
    /// label.
    pub fn new(
        value: Value,
        shape: Shape,
        code: Code,
        children: Option<Vec<(Label, ComparisonResult)>>,
    ) -> Result<Self, ContourError> {
        let children = match children {
            Some(entries) if !entries.is_empty() => Some(Children::from_entries(entries)?),
            _ => None,
        };
        Ok(Self {
            value,
            shape,
            code,
            children,
        })
    }

    /// A node without children.
    pub fn leaf(value: Value, shape: Shape, code: Code) -> Self {
        Self {
            value,
            shape,
            code,
            children: None,
        }
    }

    /// A node whose labels are unique by construction.
    pub(crate) fn branch(
        value: Value,
        shape: Shape,
        code: Code,
        entries: Vec<(Label, ComparisonResult)>,
    ) -> Self {
        let children = if entries.is_empty() {
            None
        } else {
            Some(Children { entries })
        };
        Self {
            value,
            shape,
            code,
            children,
        }
    }

    /// The value that was checked.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The shape it was checked against, after name resolution.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Outcome of this decision.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Whether the code counts as a match.
    pub fn is_match(&self) -> bool {
        self.code.is_match()
    }

    /// Children, absent for leaf decisions.
    pub fn children(&self) -> Option<&Children> {
        self.children.as_ref()
    }

    /// Whether this decision has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The child stored under `label`.
    pub fn child(&self, label: &Label) -> Option<&ComparisonResult> {
        self.children.as_ref().and_then(|c| c.get(label))
    }

    /// Follow a chain of labels from this node.
    pub fn child_path(&self, path: &[Label]) -> Option<&ComparisonResult> {
        path.iter().try_fold(self, |node, label| node.child(label))
    }

    /// Pre-order traversal of this node and all its descendants.
    pub fn descendants(&self) -> Vec<&ComparisonResult> {
        let mut out = vec![self];
        let mut i = 0;
        while i < out.len() {
            let node = out[i];
            if let Some(children) = &node.children {
                out.extend(children.results());
            }
            i += 1;
        }
        out
    }

    /// Every node in the tree carrying `code`.
    pub fn find_code(&self, code: Code) -> Vec<&ComparisonResult> {
        self.descendants()
            .into_iter()
            .filter(|node| node.code == code)
            .collect()
    }

    /// Recursive human-readable trace of the decision.
    pub fn to_diagnostic_string(&self) -> String {
        self.to_string()
    }

    fn write_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: Option<&Label>,
        indent: usize,
    ) -> fmt::Result {
        write!(
            f,
            "{:indent$}:{} <-- compare(value: {}, shape: {})",
            "",
            self.code,
            self.value,
            self.shape,
            indent = indent
        )?;
        if let Some(label) = label {
            write!(f, "; child_label: {label}")?;
        }
        if let Some(children) = &self.children {
            for (child_label, child) in children {
                f.write_str("\n")?;
                child.write_tree(f, Some(child_label), indent + 2)?;
            }
        }
        Ok(())
    }

    /// A serializable snapshot of the tree.
    pub fn report(&self) -> ResultReport {
        self.report_with_label(None)
    }

    fn report_with_label(&self, label: Option<&Label>) -> ResultReport {
        ResultReport {
            code: self.code,
            is_match: self.is_match(),
            value: self.value.to_string(),
            shape: self.shape.to_string(),
            label: label.map(ToString::to_string),
            children: self
                .children
                .iter()
                .flat_map(|c| c.iter())
                .map(|(l, child)| child.report_with_label(Some(l)))
                .collect(),
        }
    }

    /// The report rendered as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, ContourError> {
        serde_json::to_value(self.report()).map_err(|e| ContourError::Serialization(e.to_string()))
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, None, 0)
    }
}

/// Serializable form of a result tree, with values and shapes rendered as
/// literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultReport {
    /// Outcome code.
    pub code: Code,
    /// Whether the code counts as a match.
    #[serde(rename = "match")]
    pub is_match: bool,
    /// Rendered value.
    pub value: String,
    /// Rendered shape.
    pub shape: String,
    /// Rendered label under which the parent stores this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Child reports in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResultReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(code: Code) -> ComparisonResult {
        ComparisonResult::leaf(Value::Int(1), Shape::INTEGER, code)
    }

    #[test]
    fn builds_with_children() {
        let result = ComparisonResult::new(
            Value::Int(1),
            Shape::INTEGER,
            Code::Match,
            Some(vec![(Label::Value(Value::sym("child")), leaf(Code::Match))]),
        )
        .unwrap();
        assert!(result.is_match());
        assert_eq!(result.children().map(Children::len), Some(1));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = ComparisonResult::new(
            Value::Int(1),
            Shape::INTEGER,
            Code::Match,
            Some(vec![
                (Label::VALUES, leaf(Code::Match)),
                (Label::VALUES, leaf(Code::Mismatch)),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ContourError::InvalidChildResults(_)));
    }

    #[test]
    fn empty_children_are_absent() {
        let result =
            ComparisonResult::new(Value::Int(1), Shape::INTEGER, Code::Match, Some(vec![])).unwrap();
        assert!(result.is_leaf());
        assert!(result.children().is_none());
    }

    #[test]
    fn match_status_comes_from_own_code() {
        let result = ComparisonResult::branch(
            Value::Int(1),
            Shape::INTEGER,
            Code::Mismatch,
            vec![(Label::VALUES, leaf(Code::Match))],
        );
        assert!(!result.is_match());
    }

    #[test]
    fn renders_indented_tree() {
        let result = ComparisonResult::branch(
            Value::seq([1]),
            Shape::seq([Shape::INTEGER]),
            Code::SequenceMatch,
            vec![(Label::Value(Value::Int(1)), leaf(Code::Match))],
        );
        assert_eq!(
            result.to_diagnostic_string(),
            ":sequence_match <-- compare(value: [1], shape: [Integer])\n  \
             :match <-- compare(value: 1, shape: Integer); child_label: 1"
        );
        assert_eq!(Label::REQUIRED_KEYS.to_string(), ":$required_keys");
    }

    #[test]
    fn report_serializes_to_json() {
        let result = ComparisonResult::branch(
            Value::seq([1]),
            Shape::ARRAY,
            Code::SequenceMatch,
            vec![(Label::KV_KEY, leaf(Code::ExactMatch))],
        );
        let json = result.to_json().unwrap();
        assert_eq!(json["code"], "sequence_match");
        assert_eq!(json["match"], true);
        assert_eq!(json["shape"], "Array");
        assert_eq!(json["children"][0]["label"], ":$kv_key");
        assert!(json.get("label").is_none());

        let parsed: ResultReport = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result.report());
    }

    #[test]
    fn child_path_and_find_code() {
        let inner = ComparisonResult::branch(
            Value::sym("a"),
            Shape::SYMBOL,
            Code::KeyMissing,
            vec![],
        );
        let outer = ComparisonResult::branch(
            Value::Int(1),
            Shape::INTEGER,
            Code::MapMismatch,
            vec![(
                Label::REQUIRED_KEYS,
                ComparisonResult::branch(
                    Value::Int(1),
                    Shape::INTEGER,
                    Code::MapHasMissingKeys,
                    vec![(Label::Shape(Shape::sym("a")), inner.clone())],
                ),
            )],
        );
        let found = outer.child_path(&[Label::REQUIRED_KEYS, Label::Shape(Shape::sym("a"))]);
        assert_eq!(found, Some(&inner));
        assert_eq!(outer.find_code(Code::KeyMissing).len(), 1);
        assert_eq!(outer.descendants().len(), 3);
    }
}
