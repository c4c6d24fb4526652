use std::{any::TypeId, collections::HashMap};

use crate::field::{error::FieldError, replicated::ReplicatedValue};

/// Identifier for a registered replicated field type
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub struct FieldKind {
    type_id: TypeId,
}

impl FieldKind {
    pub fn of<V: ReplicatedValue>() -> Self {
        Self {
            type_id: TypeId::of::<V>(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct FieldEntry {
    net_id: u16,
    name: &'static str,
    // monomorphized decode probe, used to reject undecodable payloads before
    // they reach the store
    validate: fn(&[u8]) -> bool,
}

/// Registry of every replicated field type known to the protocol. Net IDs
/// are assigned in registration order, so they are wire-stable as long as
/// both participants register fields in the same order.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldKinds {
    kind_map: HashMap<FieldKind, FieldEntry>,
    net_id_map: HashMap<u16, FieldKind>,
    current_net_id: u16,
}

impl FieldKinds {
    pub fn new() -> Self {
        Self {
            kind_map: HashMap::new(),
            net_id_map: HashMap::new(),
            current_net_id: 0,
        }
    }

    pub fn add_field<V: ReplicatedValue>(&mut self) {
        let kind = FieldKind::of::<V>();
        if self.kind_map.contains_key(&kind) {
            return;
        }
        let net_id = self.current_net_id;
        self.kind_map.insert(
            kind,
            FieldEntry {
                net_id,
                name: V::name(),
                validate: |payload| bincode::deserialize::<V>(payload).is_ok(),
            },
        );
        self.net_id_map.insert(net_id, kind);
        self.current_net_id += 1;
    }

    pub fn net_id_of(&self, kind: &FieldKind) -> Result<u16, FieldError> {
        self.kind_map
            .get(kind)
            .map(|entry| entry.net_id)
            .ok_or(FieldError::FieldKindNotFound)
    }

    pub fn kind_from_net_id(&self, net_id: u16) -> Result<FieldKind, FieldError> {
        self.net_id_map
            .get(&net_id)
            .copied()
            .ok_or(FieldError::NetIdNotFound { net_id })
    }

    pub fn name_of(&self, kind: &FieldKind) -> &'static str {
        self.kind_map
            .get(kind)
            .map(|entry| entry.name)
            .unwrap_or("unknown")
    }

    pub fn validate(&self, kind: &FieldKind, payload: &[u8]) -> bool {
        self.kind_map
            .get(kind)
            .map(|entry| (entry.validate)(payload))
            .unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.kind_map.len()
    }
}

impl Default for FieldKinds {
    fn default() -> Self {
        Self::new()
    }
}
