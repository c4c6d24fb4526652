use std::collections::VecDeque;

use crate::{
    pool::{
        entity_kinds::{EntityKind, EntityKinds, PoolConfig},
        error::PoolError,
        handle::PoolHandle,
    },
    transform::Transform,
};

struct PoolSlot {
    active: bool,
    transform: Transform,
}

impl PoolSlot {
    fn new() -> Self {
        Self {
            active: false,
            transform: Transform::default(),
        }
    }
}

struct KindPool {
    name: &'static str,
    config: PoolConfig,
    slots: Vec<PoolSlot>,
    // oldest-released slot sits at the front and is reused first
    free: VecDeque<u16>,
}

impl KindPool {
    fn new(name: &'static str, config: PoolConfig) -> Self {
        let mut slots = Vec::with_capacity(config.initial);
        let mut free = VecDeque::with_capacity(config.initial);
        for index in 0..config.initial {
            slots.push(PoolSlot::new());
            free.push_back(index as u16);
        }
        Self {
            name,
            config,
            slots,
            free,
        }
    }
}

/// Fixed-ceiling store of pre-allocated entity slots, one sub-pool per
/// registered [`EntityKind`]. Only the authority mutates a store directly;
/// every other participant holds a mirror fed by spawn/unspawn announcements.
pub struct PoolStore {
    pools: Vec<KindPool>,
}

impl PoolStore {
    /// Pre-allocates `initial` inactive slots for every kind in the registry
    pub fn new(entity_kinds: &EntityKinds) -> Self {
        let mut pools = Vec::with_capacity(entity_kinds.count());
        for kind in entity_kinds.kinds() {
            let name = entity_kinds.name_of(&kind);
            let config = entity_kinds
                .config_of(&kind)
                .unwrap_or_else(PoolConfig::default);
            pools.push(KindPool::new(name, config));
        }
        Self { pools }
    }

    /// Returns an inactive handle for the kind, reusing the oldest-released
    /// slot first. Grows the pool by one slot while below the configured
    /// ceiling. Fails with [`PoolError::Exhausted`] once every slot is active
    /// and the ceiling is reached.
    pub fn acquire(&mut self, kind: &EntityKind) -> Result<PoolHandle, PoolError> {
        let pool = self.pool_mut(kind)?;

        if let Some(index) = pool.free.pop_front() {
            pool.slots[index as usize].active = true;
            return Ok(PoolHandle::new(*kind, index));
        }

        if pool.slots.len() < pool.config.ceiling {
            let index = pool.slots.len() as u16;
            let mut slot = PoolSlot::new();
            slot.active = true;
            pool.slots.push(slot);
            return Ok(PoolHandle::new(*kind, index));
        }

        Err(PoolError::Exhausted {
            kind: pool.name.to_string(),
            ceiling: pool.config.ceiling,
        })
    }

    /// Deactivates the handle's slot and queues it for reuse behind every
    /// slot released before it
    pub fn release(&mut self, handle: &PoolHandle) -> Result<(), PoolError> {
        let pool = self.pool_mut(&handle.kind())?;
        let index = handle.index();

        let Some(slot) = pool.slots.get_mut(index as usize) else {
            return Err(PoolError::SlotOutOfRange {
                kind: pool.name.to_string(),
                index,
                allocated: pool.slots.len(),
            });
        };
        if !slot.active {
            return Err(PoolError::SlotInactive {
                kind: pool.name.to_string(),
                index,
            });
        }

        slot.active = false;
        slot.transform = Transform::default();
        pool.free.push_back(index);
        Ok(())
    }

    pub fn set_transform(
        &mut self,
        handle: &PoolHandle,
        transform: Transform,
    ) -> Result<(), PoolError> {
        let pool = self.pool_mut(&handle.kind())?;
        let index = handle.index();

        let Some(slot) = pool.slots.get_mut(index as usize) else {
            return Err(PoolError::SlotOutOfRange {
                kind: pool.name.to_string(),
                index,
                allocated: pool.slots.len(),
            });
        };
        if !slot.active {
            return Err(PoolError::SlotInactive {
                kind: pool.name.to_string(),
                index,
            });
        }

        slot.transform = transform;
        Ok(())
    }

    pub fn transform(&self, handle: &PoolHandle) -> Option<Transform> {
        let pool = self.pools.get(handle.kind().net_id() as usize)?;
        let slot = pool.slots.get(handle.index() as usize)?;
        if slot.active {
            Some(slot.transform)
        } else {
            None
        }
    }

    pub fn is_active(&self, handle: &PoolHandle) -> bool {
        self.pools
            .get(handle.kind().net_id() as usize)
            .and_then(|pool| pool.slots.get(handle.index() as usize))
            .map(|slot| slot.active)
            .unwrap_or(false)
    }

    /// Count of currently active slots for the kind
    pub fn active_count(&self, kind: &EntityKind) -> usize {
        self.pools
            .get(kind.net_id() as usize)
            .map(|pool| pool.slots.iter().filter(|slot| slot.active).count())
            .unwrap_or(0)
    }

    /// Count of slots allocated so far for the kind, active or not
    pub fn allocated_count(&self, kind: &EntityKind) -> usize {
        self.pools
            .get(kind.net_id() as usize)
            .map(|pool| pool.slots.len())
            .unwrap_or(0)
    }

    /// Every active handle across all kinds, with its transform
    pub fn active_entities(&self) -> Vec<(PoolHandle, Transform)> {
        let mut output = Vec::new();
        for (net_id, pool) in self.pools.iter().enumerate() {
            for (index, slot) in pool.slots.iter().enumerate() {
                if slot.active {
                    let kind = EntityKind::new(net_id as u16);
                    output.push((PoolHandle::new(kind, index as u16), slot.transform));
                }
            }
        }
        output
    }

    fn pool_mut(&mut self, kind: &EntityKind) -> Result<&mut KindPool, PoolError> {
        let net_id = kind.net_id();
        self.pools
            .get_mut(net_id as usize)
            .ok_or(PoolError::UnknownKind { net_id })
    }
}
