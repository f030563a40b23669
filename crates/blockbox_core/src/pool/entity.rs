//! Pooled entity handle
//!
//! Handles are small `Copy` values that reference an instance slot owned
//! by a [`PoolRegistry`](super::PoolRegistry). A slot keeps its index for
//! its whole life, so an instance handed out again after a release comes
//! back with an identical handle.

/// Handle to a pooled instance.
///
/// Format: `kind` + 32-bit slot index
/// - Kind: pool the instance belongs to
/// - Index: slot in the registry, unique per registry and stable across reuse
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PooledEntity<K> {
    kind: K,
    index: u32,
}

impl<K: Copy> PooledEntity<K> {
    pub(crate) const fn new(kind: K, index: u32) -> Self {
        Self { kind, index }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}
