//! Settings management

use crate::DEFAULT_STARTING_QUANTITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Sandbox settings
///
/// Every field is optional in the file; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the game state is saved between sessions.
    pub save_path: PathBuf,
    /// Quantity of each block kind when no save exists yet.
    pub starting_quantity: u32,
    /// How long a spawn/destroy effect stays alive before returning to its pool.
    pub effect_lifetime_ms: u64,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn effect_lifetime(&self) -> Duration {
        Duration::from_millis(self.effect_lifetime_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("GameData.json"),
            starting_quantity: DEFAULT_STARTING_QUANTITY,
            effect_lifetime_ms: 1000,
        }
    }
}
