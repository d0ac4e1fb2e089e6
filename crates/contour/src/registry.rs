//! # Shape Registry
//!
//! Maps symbolic `$name` keys to shape definitions so shapes can reference
//! each other by name (`Shape::sym("$uuid")`).
//!
//! ## Concurrency
//!
//! The map sits behind a `parking_lot::RwLock`. Lookups take a read lock and
//! clone the definition out, so no lock is held while a comparison runs and
//! registration from another thread never observes a half-written entry.
//!
//! ## Reserved key
//!
//! `$undefined` is the key-absent marker. It is never looked up and cannot
//! be registered.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use contour_core::ContourError;
use parking_lot::RwLock;

use crate::shape::{Shape, SHAPE_SIGIL, UNDEFINED_KEY};

/// Hex 8-4-4-4-12 identifier, registered as `$uuid` and `$guid`.
pub const UUID_PATTERN: &str =
    r"\A[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\z";

/// Whether `key` can name a registered shape.
pub fn is_registrable_key(key: &str) -> bool {
    key.starts_with(SHAPE_SIGIL) && key.len() > SHAPE_SIGIL.len_utf8() && key != UNDEFINED_KEY
}

/// Thread-safe mapping from `$name` keys to shapes.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: RwLock<HashMap<String, Shape>>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in `$uuid` and `$guid` shapes.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        match Shape::pattern(UUID_PATTERN) {
            Ok(uuid) => {
                for key in ["$uuid", "$guid"] {
                    if let Err(e) = registry.register(key, uuid.clone()) {
                        tracing::warn!(key, error = %e, "failed to register built-in shape");
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "built-in identifier pattern did not compile"),
        }
        registry
    }

    /// The process-wide registry used by [`crate::compare`].
    pub fn global() -> Arc<ShapeRegistry> {
        static GLOBAL: OnceLock<Arc<ShapeRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ShapeRegistry::with_builtins())))
    }

    /// Register a new named shape.
    ///
    /// # Errors
    ///
    /// - `ContourError::InvalidKey` if `key` is not `$`-prefixed or is `$undefined`.
    /// - `ContourError::DuplicateShapeKey` if `key` is already registered.
    pub fn register(&self, key: &str, shape: impl Into<Shape>) -> Result<(), ContourError> {
        Self::check_key(key)?;
        let shape = shape.into();
        let mut guard = self.shapes.write();
        if guard.contains_key(key) {
            return Err(ContourError::DuplicateShapeKey(key.to_string()));
        }
        tracing::debug!(key, shape = %shape, "registered shape");
        guard.insert(key.to_string(), shape);
        Ok(())
    }

    /// Register or overwrite a named shape, returning the previous definition.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::InvalidKey` if `key` is not registrable.
    pub fn replace(
        &self,
        key: &str,
        shape: impl Into<Shape>,
    ) -> Result<Option<Shape>, ContourError> {
        Self::check_key(key)?;
        let shape = shape.into();
        tracing::debug!(key, shape = %shape, "replaced shape");
        Ok(self.shapes.write().insert(key.to_string(), shape))
    }

    fn check_key(key: &str) -> Result<(), ContourError> {
        if is_registrable_key(key) {
            Ok(())
        } else {
            Err(ContourError::InvalidKey(key.to_string()))
        }
    }

    /// A copy of the shape registered under `key`.
    pub fn get(&self, key: &str) -> Option<Shape> {
        self.shapes.read().get(key).cloned()
    }

    /// Whether `key` has a registered shape.
    pub fn contains(&self, key: &str) -> bool {
        self.shapes.read().contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shapes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.read().len()
    }

    /// Whether no shapes are registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.read().is_empty()
    }

    /// Resolve a named shape to its definition. Every other shape, the
    /// key-absent marker included, passes through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::UnknownShape` for an unregistered name.
    pub fn resolve<'s>(&self, shape: &'s Shape) -> Result<Cow<'s, Shape>, ContourError> {
        match shape {
            Shape::Named(name) if name == UNDEFINED_KEY => Ok(Cow::Owned(Shape::Undefined)),
            Shape::Named(name) => self
                .get(name)
                .map(Cow::Owned)
                .ok_or_else(|| ContourError::UnknownShape(name.clone())),
            other => Ok(Cow::Borrowed(other)),
        }
    }
}
