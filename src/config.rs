//! Run configuration.

use crate::errors::{BddError, BddResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a spec run.
///
/// Can be loaded from a TOML file:
///
/// ```toml
/// debug = true
/// color = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Keep the process alive when the run fails instead of exiting with status 1.
    pub debug: bool,
    /// Wrap the report in terminal color escapes.
    pub color: bool,
}

impl RunConfig {
    /// Non-exiting configuration, used when the caller inspects the report itself.
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> BddResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| BddError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| BddError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            debug: false,
            color: true,
        }
    }
}
