use std::{collections::HashMap, marker::PhantomData, mem, net::SocketAddr, vec::IntoIter};

use tether_shared::{
    read_values, CharacterId, FieldKind, PoolHandle, ReplicatedValue, Transform,
};

use crate::error::ClientError;

pub struct Events {
    connections: Vec<SocketAddr>,
    rejections: Vec<SocketAddr>,
    spawns: Vec<(PoolHandle, Transform)>,
    unspawns: Vec<PoolHandle>,
    field_updates: HashMap<FieldKind, Vec<Vec<u8>>>,
    member_joins: Vec<(SocketAddr, CharacterId)>,
    member_leaves: Vec<SocketAddr>,
    errors: Vec<ClientError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            rejections: Vec::new(),
            spawns: Vec::new(),
            unspawns: Vec::new(),
            field_updates: HashMap::new(),
            member_joins: Vec::new(),
            member_leaves: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        return V::iter(self);
    }

    pub fn has<V: Event>(&self) -> bool {
        return V::has(self);
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, server_addr: SocketAddr) {
        self.connections.push(server_addr);
        self.empty = false;
    }

    pub(crate) fn push_rejection(&mut self, server_addr: SocketAddr) {
        self.rejections.push(server_addr);
        self.empty = false;
    }

    pub(crate) fn push_spawn(&mut self, handle: &PoolHandle, transform: Transform) {
        self.spawns.push((*handle, transform));
        self.empty = false;
    }

    pub(crate) fn push_unspawn(&mut self, handle: &PoolHandle) {
        self.unspawns.push(*handle);
        self.empty = false;
    }

    pub(crate) fn push_field_update(&mut self, field_kind: FieldKind, payload: Vec<u8>) {
        if !self.field_updates.contains_key(&field_kind) {
            self.field_updates.insert(field_kind, Vec::new());
        }
        let list = self.field_updates.get_mut(&field_kind).unwrap();
        list.push(payload);
        self.empty = false;
    }

    pub(crate) fn push_member_join(&mut self, address: SocketAddr, character: CharacterId) {
        self.member_joins.push((address, character));
        self.empty = false;
    }

    pub(crate) fn push_member_leave(&mut self, address: SocketAddr) {
        self.member_leaves.push(address);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.connections.is_empty()
    }
}

// RejectEvent
pub struct RejectEvent;
impl Event for RejectEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.rejections);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.rejections.is_empty()
    }
}

// SpawnEvent
pub struct SpawnEvent;
impl Event for SpawnEvent {
    type Iter = IntoIter<(PoolHandle, Transform)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.spawns);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.spawns.is_empty()
    }
}

// UnspawnEvent
pub struct UnspawnEvent;
impl Event for UnspawnEvent {
    type Iter = IntoIter<PoolHandle>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.unspawns);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.unspawns.is_empty()
    }
}

// FieldUpdateEvent
pub struct FieldUpdateEvent<V: ReplicatedValue> {
    phantom_v: PhantomData<V>,
}
impl<V: ReplicatedValue> Event for FieldUpdateEvent<V> {
    type Iter = IntoIter<V>;

    fn iter(events: &mut Events) -> Self::Iter {
        let field_kind: FieldKind = FieldKind::of::<V>();
        return if let Some(payloads) = events.field_updates.remove(&field_kind) {
            IntoIterator::into_iter(read_values(payloads))
        } else {
            IntoIterator::into_iter(Vec::new())
        };
    }

    fn has(events: &Events) -> bool {
        let field_kind: FieldKind = FieldKind::of::<V>();
        return events.field_updates.contains_key(&field_kind);
    }
}

// MemberJoinEvent
pub struct MemberJoinEvent;
impl Event for MemberJoinEvent {
    type Iter = IntoIter<(SocketAddr, CharacterId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.member_joins);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.member_joins.is_empty()
    }
}

// MemberLeaveEvent
pub struct MemberLeaveEvent;
impl Event for MemberLeaveEvent {
    type Iter = IntoIter<SocketAddr>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.member_leaves);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.member_leaves.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<ClientError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
