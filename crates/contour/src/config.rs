//! Comparator configuration.
//!
//! Shapes may reference each other by name, so a cyclic definition
//! (`$a` → `[$a]`) would recurse forever. The depth limit turns that into
//! a `DepthLimitExceeded` error. The same limit bounds finite but deeply
//! nested data, so the default stays within what a 2 MB thread stack holds
//! in an unoptimized build. Override via environment variable or explicit
//! construction.

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth of a single comparison.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Environment variable read by [`CompareConfig::from_env`].
pub const MAX_DEPTH_VAR: &str = "CONTOUR_MAX_DEPTH";

/// Settings applied to every comparison made by a comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Maximum number of nested comparison calls.
    pub max_depth: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompareConfig {
    /// Configuration with an explicit depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CONTOUR_MAX_DEPTH` (default: 128)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(MAX_DEPTH_VAR) {
            Ok(raw) => Ok(Self {
                max_depth: parse_depth(&raw)?,
            }),
            Err(_) => Ok(Self::default()),
        }
    }
}

fn parse_depth(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue(
            MAX_DEPTH_VAR.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(depth) => Ok(depth),
        Err(e) => Err(ConfigError::InvalidValue(MAX_DEPTH_VAR.to_string(), e.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to an unusable value: `(variable, reason)`.
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
