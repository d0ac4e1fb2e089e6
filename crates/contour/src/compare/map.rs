//! # Keyed-Map Comparison
//!
//! A map shape pairs shape keys with shape values. A value map matches when
//! three independent checks all pass:
//!
//! - **Required keys** (`$required_keys`): every literal shape key is present,
//!   matched by some value key, or explicitly optional (its shape value
//!   accepts the key-absent marker).
//! - **Extra keys** (`$extra_keys`): every value key is allowed by some shape key.
//! - **Values** (`$values`): every value entry matches a shape entry.
//!
//! ## General keys and exact overrides
//!
//! A shape key that is a matcher (`Symbol`, a pattern, a range, a predicate)
//! is a *general* entry: it is never required and applies to every value key
//! it accepts. When a value key equals a shape key exactly, only that entry's
//! shape value is checked (`kv_specific_*`), whatever general entries exist
//! and in whatever order they were declared. Otherwise every shape entry is
//! tried (`kv_*`) and one full key+value match is enough.

use contour_core::{ContourError, Value, ValueKind, ValueMap};

use crate::code::Code;
use crate::compare::Scope;
use crate::matcher::{Kind, Matcher};
use crate::result::{ComparisonResult, Label};
use crate::shape::{Shape, ShapeMap};

/// Compare a map value against a shape.
///
/// # Errors
///
/// Returns `ContourError::TypeMismatch` if `value` is not a map, and
/// propagates registry and depth-limit errors from nested comparisons.
pub fn compare(scope: &Scope<'_>, value: &Value, shape: &Shape) -> Result<ComparisonResult, ContourError> {
    let Value::Map(entries) = value else {
        return Err(ContourError::TypeMismatch {
            expected: ValueKind::Map.name(),
            found: value.kind().name(),
        });
    };

    let shape_map = match shape {
        Shape::Matcher(Matcher::Kind(Kind::Hash)) => {
            return Ok(ComparisonResult::leaf(value.clone(), shape.clone(), Code::MapClassMatchesAny));
        }
        Shape::Map(shape_map) => shape_map,
        _ => return Ok(ComparisonResult::leaf(value.clone(), shape.clone(), Code::ClassMismatch)),
    };
    if shape.equals_value(value) {
        return Ok(ComparisonResult::leaf(value.clone(), shape.clone(), Code::MapExactMatch));
    }

    let checks = MapChecks {
        scope,
        value,
        entries,
        shape,
        shape_map,
    };
    let children = vec![
        (Label::REQUIRED_KEYS, checks.required_keys()?),
        (Label::EXTRA_KEYS, checks.extra_keys()?),
        (Label::VALUES, checks.values()?),
    ];
    let code = if children.iter().all(|(_, r)| r.is_match()) {
        Code::MapMatch
    } else {
        Code::MapMismatch
    };
    Ok(ComparisonResult::branch(value.clone(), shape.clone(), code, children))
}

struct MapChecks<'c, 's> {
    scope: &'c Scope<'s>,
    value: &'c Value,
    entries: &'c ValueMap,
    shape: &'c Shape,
    shape_map: &'c ShapeMap,
}

impl MapChecks<'_, '_> {
    fn section(&self, children: Vec<(Label, ComparisonResult)>, pass: Code, fail: Code) -> ComparisonResult {
        let code = if children.iter().all(|(_, r)| r.is_match()) { pass } else { fail };
        ComparisonResult::branch(self.value.clone(), self.shape.clone(), code, children)
    }

    fn required_keys(&self) -> Result<ComparisonResult, ContourError> {
        let mut checks = Vec::new();
        for (s_key, s_value) in self.shape_map {
            if !is_required_key(self.scope, s_key)? {
                continue;
            }
            checks.push((Label::Shape(s_key.clone()), self.required_key(s_key, s_value)?));
        }
        Ok(self.section(checks, Code::MapNoMissingKeys, Code::MapHasMissingKeys))
    }

    fn required_key(&self, s_key: &Shape, s_value: &Shape) -> Result<ComparisonResult, ContourError> {
        if let Some(v_key) = self.entries.keys().find(|k| s_key.equals_value(k)) {
            return Ok(ComparisonResult::leaf(v_key.clone(), s_key.clone(), Code::KeyExactMatch));
        }

        let mut key_results = Vec::with_capacity(self.entries.len());
        for v_key in self.entries.keys() {
            key_results.push((Label::Value(v_key.clone()), self.scope.compare(v_key, s_key)?));
        }
        let matched: Vec<Value> = key_results
            .iter()
            .filter(|(_, r)| r.is_match())
            .map(|(_, r)| r.value().clone())
            .collect();
        if !matched.is_empty() {
            return Ok(ComparisonResult::branch(
                Value::Seq(matched),
                s_key.clone(),
                Code::KeyMatch,
                key_results,
            ));
        }

        let code = if self.scope.compare(&Value::Undefined, s_value)?.is_match() {
            Code::KeyOptional
        } else {
            Code::KeyMissing
        };
        Ok(ComparisonResult::leaf(Value::Undefined, s_key.clone(), code))
    }

    fn extra_keys(&self) -> Result<ComparisonResult, ContourError> {
        let mut checks = Vec::with_capacity(self.entries.len());
        for v_key in self.entries.keys() {
            let result = match self.shape_map.find_exact(v_key) {
                Some((s_key, _)) => {
                    ComparisonResult::leaf(v_key.clone(), s_key.clone(), Code::KeyExactlyAllowed)
                }
                None => {
                    let mut key_results = Vec::with_capacity(self.shape_map.len());
                    for s_key in self.shape_map.keys() {
                        key_results.push((Label::Shape(s_key.clone()), self.scope.compare(v_key, s_key)?));
                    }
                    let code = if key_results.iter().any(|(_, r)| r.is_match()) {
                        Code::KeyMatchAllowed
                    } else {
                        Code::KeyNotAllowed
                    };
                    let shape_keys = Shape::Seq(self.shape_map.keys().cloned().collect());
                    ComparisonResult::branch(v_key.clone(), shape_keys, code, key_results)
                }
            };
            checks.push((Label::Value(v_key.clone()), result));
        }
        Ok(self.section(checks, Code::MapNoExtraKeys, Code::MapHasExtraKeys))
    }

    fn values(&self) -> Result<ComparisonResult, ContourError> {
        let mut checks = Vec::with_capacity(self.entries.len());
        for (v_key, v_value) in self.entries {
            let pair = Value::map([(v_key.clone(), v_value.clone())]);
            let result = match self.shape_map.find_exact(v_key) {
                Some((s_key, s_value)) => self.specific_kv(&pair, v_value, s_key, s_value)?,
                None => self.general_kv(&pair, v_key, v_value)?,
            };
            checks.push((Label::Value(pair), result));
        }
        Ok(self.section(checks, Code::MapValuesMatch, Code::MapValuesMismatch))
    }

    fn specific_kv(
        &self,
        pair: &Value,
        v_value: &Value,
        s_key: &Shape,
        s_value: &Shape,
    ) -> Result<ComparisonResult, ContourError> {
        let result = self.scope.compare(v_value, s_value)?;
        let code = if result.is_match() {
            Code::KvSpecificMatch
        } else {
            Code::KvSpecificMismatch
        };
        Ok(ComparisonResult::branch(
            pair.clone(),
            Shape::Map(ShapeMap::single(s_key.clone(), s_value.clone())),
            code,
            vec![(Label::Shape(s_value.clone()), result)],
        ))
    }

    fn general_kv(&self, pair: &Value, v_key: &Value, v_value: &Value) -> Result<ComparisonResult, ContourError> {
        let mut kv_results = Vec::with_capacity(self.shape_map.len());
        for (s_key, s_value) in self.shape_map {
            let shape_kv = Shape::Map(ShapeMap::single(s_key.clone(), s_value.clone()));
            let key_result = self.scope.compare(v_key, s_key)?;
            let value_result = self.scope.compare(v_value, s_value)?;
            let code = if !key_result.is_match() {
                Code::KvKeyMismatch
            } else if !value_result.is_match() {
                Code::KvValueMismatch
            } else {
                Code::KvValueMatch
            };
            let individual = ComparisonResult::branch(
                pair.clone(),
                shape_kv.clone(),
                code,
                vec![(Label::KV_KEY, key_result), (Label::KV_VALUE, value_result)],
            );
            kv_results.push((Label::Shape(shape_kv), individual));
        }
        let code = if kv_results.iter().any(|(_, r)| r.is_match()) {
            Code::KvMatch
        } else {
            Code::KvMismatch
        };
        Ok(ComparisonResult::branch(pair.clone(), self.shape.clone(), code, kv_results))
    }
}

/// Whether a shape key must be present in a value map.
///
/// General matchers, the universal shape and the key-absent marker are never
/// required. Composite keys are required only if all their parts are.
///
/// # Errors
///
/// Returns `ContourError::UnknownShape` for an unregistered named key and
/// `ContourError::DepthLimitExceeded` for a cyclic one.
pub fn is_required_key(scope: &Scope<'_>, key: &Shape) -> Result<bool, ContourError> {
    match key {
        Shape::Matcher(_) | Shape::Anything | Shape::Undefined => Ok(false),
        Shape::Seq(items) => all_required(scope, items),
        Shape::Map(map) => all_required(scope, map.iter().flat_map(|(k, v)| [k, v])),
        Shape::AnyOf(any_of) => all_required(scope, any_of),
        Shape::Named(_) => {
            let inner = scope.descend()?;
            let resolved = scope.registry().resolve(key)?;
            is_required_key(&inner, &resolved)
        }
        Shape::Custom(custom) => Ok(custom.is_required_key()),
        Shape::Literal(_) => Ok(true),
    }
}

fn all_required<'k>(scope: &Scope<'_>, keys: impl IntoIterator<Item = &'k Shape>) -> Result<bool, ContourError> {
    for key in keys {
        if !is_required_key(scope, key)? {
            return Ok(false);
        }
    }
    Ok(true)
}
