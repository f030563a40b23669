//! Blockbox Services Layer
//!
//! Everything around the core that touches the outside world or tracks
//! player state: saves, settings, and the block inventory.

pub mod inventory;
pub mod save;
pub mod settings;

pub use inventory::{Inventory, InventoryError};
pub use save::{BlockRecord, InventoryRecord, SaveData, SaveError, SaveStore};
pub use settings::{Settings, SettingsError};

/// Quantity of each block kind a new game starts with.
pub const DEFAULT_STARTING_QUANTITY: u32 = 10;
