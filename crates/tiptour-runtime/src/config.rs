#![forbid(unsafe_code)]

//! JSON tour configuration (requires the `config` feature).
//!
//! ```json
//! {
//!   "key": "onboarding",
//!   "appearance": {
//!     "button_mode": "next_only",
//!     "overlay_color": "#000000FF",
//!     "overlay_opacity": 0.6,
//!     "fade_in": 300,
//!     "labels": { "complete": "Done" }
//!   }
//! }
//! ```
//!
//! Every field is optional; missing values take their defaults. `fade_in`
//! is in milliseconds.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::appearance::AppearanceConfig;
use crate::controller::TourController;
use crate::presenter::Presenter;
use crate::target::GeometryResolver;

/// Errors from loading a [`TourConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The contents are not a valid configuration.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read tour config: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid tour config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Serializable tour settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Persistence key; `None` disables "show once".
    pub key: Option<String>,
    pub appearance: AppearanceConfig,
}

impl TourConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), key = ?config.key, "loaded tour config");
        Ok(config)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<R: GeometryResolver, P: Presenter> TourController<R, P> {
    /// Apply a loaded configuration: appearance, and the key if one is set.
    #[must_use]
    pub fn with_config(self, config: TourConfig) -> Self {
        let tour = self.with_appearance(config.appearance);
        match config.key {
            Some(key) => tour.with_key(key),
            None => tour,
        }
    }
}
