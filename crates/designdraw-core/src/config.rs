//! Engine tuning loaded from JSON.

use crate::extent::ExtentPolicy;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable constants of the interaction engine.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Undo entries kept before the oldest is evicted.
    pub history_limit: usize,
    /// Extent of a new document.
    pub min_extent: Size,
    /// Space kept between content and the extent edge.
    pub extent_margin: f64,
    /// Extent growth step.
    pub extent_grid: f64,
    /// Drawn shapes narrower or shorter than this are discarded.
    pub min_shape_size: f64,
    /// Smallest size a resize can produce.
    pub min_resize_size: f64,
    /// Seconds between autosaves.
    pub autosave_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: crate::history::MAX_UNDO_HISTORY,
            min_extent: Size::new(1200.0, 800.0),
            extent_margin: 200.0,
            extent_grid: 500.0,
            min_shape_size: 5.0,
            min_resize_size: crate::selection::MIN_RESIZE_SIZE,
            autosave_interval_secs: crate::storage::DEFAULT_AUTOSAVE_INTERVAL_SECS,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Extent growth rules derived from this config.
    pub fn extent_policy(&self) -> ExtentPolicy {
        ExtentPolicy {
            min: self.min_extent,
            margin: self.extent_margin,
            grid: self.extent_grid,
        }
    }
}
