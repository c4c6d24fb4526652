use serde::{Deserialize, Serialize};

use crate::pool::error::PoolError;

/// Identifier for a pool category (projectile, enemy, pickup, ...).
/// Assigned by the [`EntityKinds`] registry in registration order, so it is
/// wire-stable as long as both participants register kinds in the same order.
#[derive(Serialize, Deserialize, Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub struct EntityKind {
    net_id: u16,
}

impl EntityKind {
    pub(crate) fn new(net_id: u16) -> Self {
        Self { net_id }
    }

    pub fn net_id(&self) -> u16 {
        self.net_id
    }
}

/// How a kind's backing pool is sized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of handles pre-allocated at store creation
    pub initial: usize,
    /// Handle count the store may lazily grow to, never beyond
    pub ceiling: usize,
}

impl PoolConfig {
    pub fn new(initial: usize, ceiling: usize) -> Self {
        Self { initial, ceiling }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial: 8,
            ceiling: 32,
        }
    }
}

#[derive(Debug, PartialEq)]
struct EntityKindEntry {
    name: &'static str,
    config: PoolConfig,
}

/// Registry of every pool category known to the protocol, fixed once the
/// protocol is locked.
#[derive(Debug, PartialEq)]
pub struct EntityKinds {
    entries: Vec<EntityKindEntry>,
}

impl EntityKinds {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add_entity_kind(&mut self, name: &'static str, config: PoolConfig) -> EntityKind {
        let net_id = self.entries.len() as u16;
        self.entries.push(EntityKindEntry { name, config });
        EntityKind { net_id }
    }

    pub fn kind_from_net_id(&self, net_id: u16) -> Result<EntityKind, PoolError> {
        if (net_id as usize) < self.entries.len() {
            Ok(EntityKind { net_id })
        } else {
            Err(PoolError::UnknownKind { net_id })
        }
    }

    pub fn kind_by_name(&self, name: &str) -> Option<EntityKind> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| EntityKind {
                net_id: index as u16,
            })
    }

    pub fn name_of(&self, kind: &EntityKind) -> &'static str {
        self.entries
            .get(kind.net_id as usize)
            .map(|entry| entry.name)
            .unwrap_or("unknown")
    }

    pub fn config_of(&self, kind: &EntityKind) -> Option<PoolConfig> {
        self.entries
            .get(kind.net_id as usize)
            .map(|entry| entry.config)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over every registered kind, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        (0..self.entries.len()).map(|index| EntityKind {
            net_id: index as u16,
        })
    }
}

impl Default for EntityKinds {
    fn default() -> Self {
        Self::new()
    }
}
