//! Tether configuration
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [anchor]
//! hysteresis_px = 1.0
//!
//! [ghost]
//! drag_ratio = 0.1
//! epsilon = 1e-6
//! auto_hide = false
//! ```

use crate::error::{Result, TetherError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TetherConfig {
    pub anchor: AnchorConfig,
    pub ghost: GhostConfig,
}

/// Anchor tracking settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Movement (in overlay pixels, per axis) below which coordinates are kept
    pub hysteresis_px: f32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self { hysteresis_px: 1.0 }
    }
}

/// Ghost behavior settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GhostConfig {
    /// Fraction of the remaining distance closed per tick, in (0, 1)
    pub drag_ratio: f32,
    /// Step magnitude at or below which a channel snaps to its goal
    pub epsilon: f32,
    /// Hide the proxy once it has converged
    pub auto_hide: bool,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            drag_ratio: 0.1,
            epsilon: 1e-6,
            auto_hide: false,
        }
    }
}

impl TetherConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TetherConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded tether configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.anchor.validate()?;
        self.ghost.validate()
    }
}

impl AnchorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.hysteresis_px >= 0.0) {
            return Err(TetherError::InvalidConfig(format!(
                "anchor.hysteresis_px must be >= 0, got {}",
                self.hysteresis_px
            )));
        }
        Ok(())
    }
}

impl GhostConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.drag_ratio > 0.0 && self.drag_ratio < 1.0) {
            return Err(TetherError::InvalidConfig(format!(
                "ghost.drag_ratio must be in (0, 1), got {}",
                self.drag_ratio
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(TetherError::InvalidConfig(format!(
                "ghost.epsilon must be > 0, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
