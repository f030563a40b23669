//! Save game persistence
//!
//! The game state is a single JSON document holding every placed block
//! and the remaining inventory. A missing document is a new game; a
//! malformed one is an error and is never overwritten implicitly.

use crate::inventory::Inventory;
use blockbox_core::{BlockKind, GridCoord, OccupancyIndex};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("corrupt save file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode save data: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A block placed in the world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub kind: BlockKind,
    pub position: GridCoord,
}

/// Blocks of one kind left in the inventory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub kind: BlockKind,
    pub quantity: u32,
}

/// Serializable game state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub blocks: Vec<BlockRecord>,
    pub inventory: Vec<InventoryRecord>,
}

impl SaveData {
    /// Empty world with `starting_quantity` blocks of every kind.
    pub fn new_game(starting_quantity: u32) -> Self {
        Self {
            blocks: Vec::new(),
            inventory: BlockKind::ALL
                .iter()
                .map(|&kind| InventoryRecord {
                    kind,
                    quantity: starting_quantity,
                })
                .collect(),
        }
    }

    /// Record the live world. Blocks are sorted by position so identical
    /// worlds always produce identical files.
    pub fn capture<E>(blocks: &OccupancyIndex<BlockKind, E>, inventory: &Inventory) -> Self {
        let mut records: Vec<BlockRecord> = blocks
            .iter()
            .map(|(position, occupant)| BlockRecord {
                kind: occupant.kind,
                position,
            })
            .collect();
        records.sort_unstable_by_key(|record| record.position);

        Self {
            blocks: records,
            inventory: inventory
                .iter()
                .map(|(kind, quantity)| InventoryRecord { kind, quantity })
                .collect(),
        }
    }

    /// Build the inventory table. Kinds missing from the record hold zero.
    pub fn inventory(&self) -> Inventory {
        let mut inventory = Inventory::new();
        for record in &self.inventory {
            inventory.set_quantity(record.kind, record.quantity);
        }
        inventory
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Reads and writes [`SaveData`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state, or `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SaveData>, SaveError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        let data = SaveData::from_json(&text).map_err(|source| SaveError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            blocks = data.blocks.len(),
            "loaded save"
        );
        Ok(Some(data))
    }

    /// Load the saved state, starting a new game if there is none.
    pub fn load_or_new_game(&self, starting_quantity: u32) -> Result<SaveData, SaveError> {
        match self.load()? {
            Some(data) => Ok(data),
            None => {
                info!(path = %self.path.display(), "no save found, starting new game");
                Ok(SaveData::new_game(starting_quantity))
            }
        }
    }

    /// Write `data`, replacing any previous save.
    ///
    /// The document goes to a sibling `.tmp` file first and is renamed into
    /// place, so an interrupted write leaves the old save intact.
    pub fn save(&self, data: &SaveData) -> Result<(), SaveError> {
        let json = data.to_json().map_err(SaveError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|source| SaveError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;

        info!(
            path = %self.path.display(),
            blocks = data.blocks.len(),
            "game saved"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: io::Error) -> SaveError {
        SaveError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SaveData {
        SaveData {
            blocks: vec![
                BlockRecord {
                    kind: BlockKind::Red,
                    position: GridCoord::new(1, 0, 2),
                },
                BlockRecord {
                    kind: BlockKind::Blue,
                    position: GridCoord::new(1, 1, 2),
                },
            ],
            inventory: vec![
                InventoryRecord {
                    kind: BlockKind::Red,
                    quantity: 9,
                },
                InventoryRecord {
                    kind: BlockKind::Green,
                    quantity: 10,
                },
                InventoryRecord {
                    kind: BlockKind::Blue,
                    quantity: 9,
                },
            ],
        }
    }

    #[test]
    fn new_game_has_ten_of_each_kind() {
        let data = SaveData::new_game(crate::DEFAULT_STARTING_QUANTITY);
        assert!(data.blocks.is_empty());
        let inventory = data.inventory();
        for kind in BlockKind::ALL {
            assert_eq!(inventory.quantity(kind), 10);
        }
    }

    #[test]
    fn json_layout_is_stable() {
        let data = SaveData {
            blocks: vec![BlockRecord {
                kind: BlockKind::Green,
                position: GridCoord::new(-1, 0, 3),
            }],
            inventory: vec![InventoryRecord {
                kind: BlockKind::Green,
                quantity: 4,
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "blocks": [{ "kind": "Green", "position": { "x": -1, "y": 0, "z": 3 } }],
                "inventory": [{ "kind": "Green", "quantity": 4 }]
            })
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let data = SaveData::from_json("{}").unwrap();
        assert!(data.blocks.is_empty());
        assert_eq!(data.inventory().quantity(BlockKind::Red), 0);
    }

    #[test]
    fn absent_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("GameData.json"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(
            store.load_or_new_game(10).unwrap(),
            SaveData::new_game(10)
        );
    }

    #[test]
    fn save_then_load_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("nested").join("GameData.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!dir.path().join("nested").join("GameData.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GameData.json");
        fs::write(&path, "{\"blocks\": [").unwrap();

        let store = SaveStore::new(&path);
        assert!(matches!(store.load(), Err(SaveError::Parse { .. })));
        assert!(matches!(
            store.load_or_new_game(10),
            Err(SaveError::Parse { .. })
        ));
    }

    #[test]
    fn capture_sorts_blocks_by_position() {
        let mut index: OccupancyIndex<BlockKind, u32> = OccupancyIndex::new();
        index.place(GridCoord::new(2, 0, 0), BlockKind::Blue, 0).unwrap();
        index.place(GridCoord::new(0, 0, 5), BlockKind::Red, 1).unwrap();
        index.place(GridCoord::new(0, 0, 1), BlockKind::Green, 2).unwrap();

        let data = SaveData::capture(&index, &Inventory::with_starting_quantity(7));
        let positions: Vec<GridCoord> = data.blocks.iter().map(|b| b.position).collect();
        assert_eq!(
            positions,
            vec![
                GridCoord::new(0, 0, 1),
                GridCoord::new(0, 0, 5),
                GridCoord::new(2, 0, 0),
            ]
        );
        assert_eq!(data.inventory.len(), 3);
        assert!(data.inventory.iter().all(|record| record.quantity == 7));
    }
}
