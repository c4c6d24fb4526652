use serde::{Deserialize, Serialize};

use crate::pool::entity_kinds::EntityKind;

/// A stable slot in a per-kind pool. Handles are created when the store
/// allocates the slot and are never destroyed, only toggled active/inactive.
#[derive(Serialize, Deserialize, Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub struct PoolHandle {
    kind: EntityKind,
    index: u16,
}

impl PoolHandle {
    pub(crate) fn new(kind: EntityKind, index: u16) -> Self {
        Self { kind, index }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn index(&self) -> u16 {
        self.index
    }
}
