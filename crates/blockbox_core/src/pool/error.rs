use thiserror::Error;

/// Errors raised by [`PoolRegistry`](super::PoolRegistry) when its usage
/// contract is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError<K> {
    #[error("kind {kind:?} is already configured")]
    AlreadyConfigured { kind: K },

    #[error("kind {kind:?} has no configured pool")]
    UnknownKind { kind: K },

    #[error("instance {index} of kind {kind:?} is not currently leased")]
    NotLeased { kind: K, index: u32 },
}
