use std::collections::HashMap;

use tether_shared::{EntityKind, PoolHandle, Transform};

/// Read-only replica of the authority's active entities. Updated exclusively
/// by spawn/unspawn announcements; the client never mutates it directly.
pub struct EntityMirror {
    active: HashMap<PoolHandle, Transform>,
}

impl EntityMirror {
    pub(crate) fn new() -> Self {
        Self {
            active: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, handle: PoolHandle, transform: Transform) {
        self.active.insert(handle, transform);
    }

    pub(crate) fn remove(&mut self, handle: &PoolHandle) -> bool {
        self.active.remove(handle).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_spawned(&self, handle: &PoolHandle) -> bool {
        self.active.contains_key(handle)
    }

    pub fn transform(&self, handle: &PoolHandle) -> Option<Transform> {
        self.active.get(handle).copied()
    }

    /// Every entity currently mirrored as spawned, with its transform
    pub fn entities(&self) -> Vec<(PoolHandle, Transform)> {
        self.active
            .iter()
            .map(|(handle, transform)| (*handle, *transform))
            .collect()
    }

    pub fn count_of(&self, kind: &EntityKind) -> usize {
        self.active
            .keys()
            .filter(|handle| handle.kind() == *kind)
            .count()
    }
}
