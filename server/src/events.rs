use std::{collections::HashMap, marker::PhantomData, mem, net::SocketAddr, vec::IntoIter};

use tether_shared::{
    read_values, CharacterId, FieldKind, PoolHandle, ReplicatedValue, Tick,
};

use crate::{error::ServerError, user::UserKey};

pub struct Events {
    joins: Vec<(UserKey, CharacterId)>,
    connections: Vec<UserKey>,
    disconnections: Vec<(UserKey, SocketAddr)>,
    spawns: Vec<PoolHandle>,
    unspawns: Vec<PoolHandle>,
    field_updates: HashMap<FieldKind, Vec<Vec<u8>>>,
    ticks: Vec<Tick>,
    errors: Vec<ServerError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            joins: Vec::new(),
            connections: Vec::new(),
            disconnections: Vec::new(),
            spawns: Vec::new(),
            unspawns: Vec::new(),
            field_updates: HashMap::new(),
            ticks: Vec::new(),
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

    pub(crate) fn push_join(&mut self, user_key: &UserKey, character: CharacterId) {
        self.joins.push((*user_key, character));
        self.empty = false;
    }

    pub(crate) fn push_connection(&mut self, user_key: &UserKey) {
        self.connections.push(*user_key);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, user_key: &UserKey, addr: SocketAddr) {
        self.disconnections.push((*user_key, addr));
        self.empty = false;
    }

    pub(crate) fn push_spawn(&mut self, handle: &PoolHandle) {
        self.spawns.push(*handle);
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

    pub(crate) fn push_tick(&mut self, tick: Tick) {
        self.ticks.push(tick);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ServerError) {
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

// JoinEvent
pub struct JoinEvent;
impl Event for JoinEvent {
    type Iter = IntoIter<(UserKey, CharacterId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.joins);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.joins.is_empty()
    }
}

// ConnectEvent
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<UserKey>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<(UserKey, SocketAddr)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.disconnections);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.disconnections.is_empty()
    }
}

// SpawnEvent
pub struct SpawnEvent;
impl Event for SpawnEvent {
    type Iter = IntoIter<PoolHandle>;

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

// TickEvent
pub struct TickEvent;
impl Event for TickEvent {
    type Iter = IntoIter<Tick>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.ticks);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.ticks.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<ServerError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        return IntoIterator::into_iter(list);
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
