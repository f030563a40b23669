//! Entity kinds known to the sandbox.
//!
//! Kinds are small, closed sets fixed at configuration time. Each one
//! gets its own pool in a [`PoolRegistry`](crate::pool::PoolRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour of a placeable block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    Red,
    Green,
    Blue,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [BlockKind::Red, BlockKind::Green, BlockKind::Blue];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Red => "red",
            BlockKind::Green => "green",
            BlockKind::Blue => "blue",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short-lived visual effect played around block placement and removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    Spawn,
    Destroy,
}

impl EffectKind {
    pub const ALL: [EffectKind; 2] = [EffectKind::Spawn, EffectKind::Destroy];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_kinds_serialize_by_variant_name() {
        let json = serde_json::to_string(&BlockKind::ALL).unwrap();
        assert_eq!(json, r#"["Red","Green","Blue"]"#);
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(BlockKind::Green.to_string(), "green");
    }
}
