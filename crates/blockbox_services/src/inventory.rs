//! Per-kind block inventory

use blockbox_core::BlockKind;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("no {kind} blocks left")]
    Exhausted { kind: BlockKind },
}

/// How many blocks of each kind the player still holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: HashMap<BlockKind, u32>,
}

impl Inventory {
    /// Empty inventory; every kind reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every kind starts with `quantity` blocks.
    pub fn with_starting_quantity(quantity: u32) -> Self {
        Self {
            counts: BlockKind::ALL.iter().map(|&kind| (kind, quantity)).collect(),
        }
    }

    pub fn quantity(&self, kind: BlockKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn set_quantity(&mut self, kind: BlockKind, quantity: u32) {
        self.counts.insert(kind, quantity);
    }

    pub fn has_any(&self, kind: BlockKind) -> bool {
        self.quantity(kind) > 0
    }

    /// Take one block out, returning the quantity left.
    pub fn take(&mut self, kind: BlockKind) -> Result<u32, InventoryError> {
        let count = self.counts.entry(kind).or_insert(0);
        if *count == 0 {
            return Err(InventoryError::Exhausted { kind });
        }
        *count -= 1;
        Ok(*count)
    }

    /// Put one block back, returning the new quantity.
    pub fn give(&mut self, kind: BlockKind) -> u32 {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Quantities in `BlockKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockKind, u32)> + '_ {
        BlockKind::ALL
            .iter()
            .map(move |&kind| (kind, self.quantity(kind)))
    }
}
