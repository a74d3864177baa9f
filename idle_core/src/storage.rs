use crate::character::Character;
use crate::game::GameCounters;
use crate::inventory::Inventory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error in '{}': {error}", .path.display())]
    Io {
        #[source]
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Persisted session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub character: Character,
    pub inventory: Inventory,
    pub zone: usize,
    #[serde(default)]
    pub counters: GameCounters,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl SaveGame {
    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import from JSON string, rejecting saves from a newer format
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version > SAVE_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: probe.version,
                supported: SAVE_VERSION,
            });
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), StorageError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| StorageError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;
        log::info!("Saved game to {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, StorageError> {
        let json = std::fs::read_to_string(path).map_err(|e| StorageError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;
        Self::from_json(&json)
    }
}
