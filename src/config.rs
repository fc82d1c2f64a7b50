use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Engine configuration, loadable from TOML.
///
/// Every field has a default, so a partial (or empty) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World-space size of one cell, used by `Board::world_position`.
    pub cell_size: f32,
    /// World-space position of cell (0, 0).
    pub origin: [f32; 2],
    /// Settle and clear any matches present right after a level is loaded.
    pub resolve_on_load: bool,
    /// Also clear the bonus neighbours of runs of four or more.
    pub clear_bonus_neighbours: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cell_size: 1.0,
            origin: [0.0, 0.0],
            resolve_on_load: true,
            clear_bonus_neighbours: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Validation(
                "cell_size must be a finite value > 0".into(),
            ));
        }
        if !self.origin.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Validation("origin must be finite".into()));
        }
        Ok(())
    }

    pub fn origin(&self) -> (f32, f32) {
        (self.origin[0], self.origin[1])
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&EngineConfig::default())
    }
}
