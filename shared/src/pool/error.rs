use thiserror::Error;

/// Errors that can occur during pool store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every slot for the kind is active and the pool is at its ceiling
    #[error("Pool for kind {kind:?} is exhausted: all {ceiling} slots are active. Raise the ceiling in PoolConfig or release handles before acquiring more")]
    Exhausted { kind: String, ceiling: usize },

    /// Network ID not found in the entity kind registry
    #[error("Network ID {net_id} not found in entity kind registry. Kind must be registered with Protocol via add_entity_kind()")]
    UnknownKind { net_id: u16 },

    /// Handle index is outside the slots allocated for its kind
    #[error("Handle index {index} is out of range for kind {kind:?}, which has {allocated} allocated slots")]
    SlotOutOfRange {
        kind: String,
        index: u16,
        allocated: usize,
    },

    /// Handle does not reference an active slot
    #[error("Handle index {index} for kind {kind:?} is not active. Handles may only be released once per acquire")]
    SlotInactive { kind: String, index: u16 },
}
