use std::{collections::HashMap, net::SocketAddr, time::Duration};

use log::{info, warn};

use tether_shared::{
    transport::server::{PacketReceiver, PacketSender},
    BigMap, CharacterId, ClientMessage, EntityKind, EntityKinds, FieldKind, FieldKinds,
    FieldStore, PoolHandle, PoolStore, Protocol, ReplicatedValue, ServerMessage, Tick, TimeQueue,
    TimerKey, Transform,
};

use crate::{
    error::ServerError,
    events::Events,
    server::ServerConfig,
    user::{User, UserKey, UserMut, UserRef, UserStatus},
};

struct Io {
    packet_sender: Box<dyn PacketSender>,
    packet_receiver: Box<dyn PacketReceiver>,
}

/// The session authority. Owns the entity pool and the backing value of
/// every replicated field; applies mutation requests from connected clients
/// and fans out announcements so every participant observes the same state.
pub struct Server {
    config: ServerConfig,
    entity_kinds: EntityKinds,
    field_kinds: FieldKinds,
    tick_interval: Duration,
    io: Option<Io>,
    pool: PoolStore,
    fields: FieldStore,
    users: BigMap<UserKey, User>,
    address_map: HashMap<SocketAddr, UserKey>,
    lifetimes: TimeQueue<PoolHandle>,
    lifetime_keys: HashMap<PoolHandle, TimerKey>,
    incoming_events: Events,
    current_tick: Tick,
    joining_open: bool,
}

impl Server {
    /// Create a new Server
    pub fn new<P: Into<Protocol>>(server_config: ServerConfig, protocol: P) -> Self {
        // split up protocol
        let protocol: Protocol = protocol.into();
        let Protocol {
            entity_kinds,
            field_kinds,
            tick_interval,
            ..
        } = protocol;

        let pool = PoolStore::new(&entity_kinds);
        let joining_open = server_config.joining_open;

        Self {
            config: server_config,
            entity_kinds,
            field_kinds,
            tick_interval,
            io: None,
            pool,
            fields: FieldStore::new(),
            users: BigMap::new(),
            address_map: HashMap::new(),
            lifetimes: TimeQueue::new(),
            lifetime_keys: HashMap::new(),
            incoming_events: Events::new(),
            current_tick: 0,
            joining_open,
        }
    }

    /// Listen on the given transport endpoints
    pub fn listen(
        &mut self,
        packet_sender: Box<dyn PacketSender>,
        packet_receiver: Box<dyn PacketReceiver>,
    ) {
        self.io = Some(Io {
            packet_sender,
            packet_receiver,
        });
        info!("Server is listening over the attached transport");
    }

    /// Returns whether or not the Server is listening for Clients
    pub fn is_listening(&self) -> bool {
        self.io.is_some()
    }

    /// Must be called regularly: drains the transport, applies every
    /// received request, and returns the events produced since last call
    pub fn receive(&mut self) -> Events {
        let mut packets: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        if let Some(io) = &mut self.io {
            loop {
                match io.packet_receiver.receive() {
                    Ok(Some((address, payload))) => {
                        packets.push((address, payload.to_vec()));
                    }
                    Ok(None) => break,
                    Err(_) => {
                        self.incoming_events.push_error(ServerError::Recv);
                        break;
                    }
                }
            }
        } else {
            self.incoming_events.push_error(ServerError::NotListening);
        }

        for (address, payload) in packets {
            self.process_packet(address, payload);
        }

        // return all received events and reset the buffer
        std::mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Advances the simulation one step: expired entity lifetimes are
    /// unspawned through the normal announce path
    pub fn tick(&mut self) {
        self.current_tick += 1;
        loop {
            let Some((_, handle)) = self.lifetimes.pop_ready(self.current_tick) else {
                break;
            };
            self.lifetime_keys.remove(&handle);
            self.unspawn(&handle);
        }
        self.incoming_events.push_tick(self.current_tick);
    }

    // Connections

    /// Accepts a pending join, bringing the new member up to the current
    /// session state and announcing it to everyone else
    pub fn accept_connection(&mut self, user_key: &UserKey) {
        let Some(user) = self.users.get_mut(user_key) else {
            warn!("accept_connection ignored: no user for key");
            return;
        };
        if user.status() != UserStatus::Pending {
            warn!("accept_connection ignored: user is not pending");
            return;
        }
        user.set_connected();
        let address = user.address();
        let character = user.character();

        info!("User at {address} joined the session");
        self.send_to(&address, &ServerMessage::JoinAccepted);
        self.send_snapshot(&address);
        self.broadcast_except(
            Some(&address),
            &ServerMessage::AnnounceMemberJoined { address, character },
        );
        self.incoming_events.push_connection(user_key);
    }

    /// Rejects a pending join, terminating the client's attempt to enter
    /// the session
    pub fn reject_connection(&mut self, user_key: &UserKey) {
        let Some(user) = self.users.get(user_key) else {
            warn!("reject_connection ignored: no user for key");
            return;
        };
        if user.status() != UserStatus::Pending {
            warn!("reject_connection ignored: user is not pending");
            return;
        }
        let address = user.address();
        self.send_to(&address, &ServerMessage::JoinRejected);
        self.users.remove(user_key);
        self.address_map.remove(&address);
    }

    /// Removes the user from the session and announces the departure to the
    /// remaining members
    pub fn disconnect_user(&mut self, user_key: &UserKey) {
        let Some(user) = self.users.remove(user_key) else {
            warn!("disconnect_user ignored: no user for key");
            return;
        };
        let address = user.address();
        self.address_map.remove(&address);
        if user.is_connected() {
            info!("User at {address} left the session");
            self.broadcast(&ServerMessage::AnnounceMemberLeft { address });
            self.incoming_events.push_disconnection(user_key, address);
        }
    }

    /// Allow new members to join the session
    pub fn open_joining(&mut self) {
        self.joining_open = true;
    }

    /// Stop accepting new members; requests received while closed are
    /// rejected without surfacing an event
    pub fn close_joining(&mut self) {
        self.joining_open = false;
    }

    pub fn is_joining_open(&self) -> bool {
        self.joining_open
    }

    // Entities

    /// Pulls a handle from the pool, positions and activates it, and
    /// announces the spawn to every connected member. Pool exhaustion is
    /// reported in the log and surfaces as a no-op
    pub fn spawn(&mut self, kind: &EntityKind, transform: Transform) -> Option<PoolHandle> {
        match self.pool.acquire(kind) {
            Ok(handle) => {
                if let Err(error) = self.pool.set_transform(&handle, transform) {
                    warn!("spawned handle could not be positioned: {error}");
                }
                self.broadcast(&ServerMessage::AnnounceSpawn { handle, transform });
                self.incoming_events.push_spawn(&handle);
                Some(handle)
            }
            Err(error) => {
                warn!("spawn failed: {error}");
                None
            }
        }
    }

    /// Spawns an entity that is automatically unspawned `lifetime` ticks
    /// from now, unless cancelled first
    pub fn spawn_with_lifetime(
        &mut self,
        kind: &EntityKind,
        transform: Transform,
        lifetime: Tick,
    ) -> Option<PoolHandle> {
        let handle = self.spawn(kind, transform)?;
        let timer_key = self.lifetimes.add(self.current_tick + lifetime, handle);
        self.lifetime_keys.insert(handle, timer_key);
        Some(handle)
    }

    /// Removes a scheduled lifetime before it expires. Returns whether a
    /// timer was actually cancelled
    pub fn cancel_lifetime(&mut self, handle: &PoolHandle) -> bool {
        if let Some(timer_key) = self.lifetime_keys.remove(handle) {
            self.lifetimes.cancel(&timer_key).is_some()
        } else {
            false
        }
    }

    /// Releases the handle back to the pool and announces the unspawn.
    /// An invalid handle is reported in the log and ignored
    pub fn unspawn(&mut self, handle: &PoolHandle) {
        if let Err(error) = self.pool.release(handle) {
            warn!("unspawn ignored: {error}");
            return;
        }
        if let Some(timer_key) = self.lifetime_keys.remove(handle) {
            self.lifetimes.cancel(&timer_key);
        }
        self.broadcast(&ServerMessage::AnnounceUnspawn { handle: *handle });
        self.incoming_events.push_unspawn(handle);
    }

    pub fn is_spawned(&self, handle: &PoolHandle) -> bool {
        self.pool.is_active(handle)
    }

    pub fn entity_transform(&self, handle: &PoolHandle) -> Option<Transform> {
        self.pool.transform(handle)
    }

    /// Every currently spawned entity, with its transform
    pub fn entities(&self) -> Vec<(PoolHandle, Transform)> {
        self.pool.active_entities()
    }

    pub fn active_count(&self, kind: &EntityKind) -> usize {
        self.pool.active_count(kind)
    }

    /// Looks up a registered entity kind by its protocol name
    pub fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        self.entity_kinds.kind_by_name(name)
    }

    // Replicated fields

    /// Applies a new field value directly (authority privilege) and
    /// announces it to every connected member
    pub fn set_field<V: ReplicatedValue>(&mut self, value: &V) {
        let kind = FieldKind::of::<V>();
        let Ok(net_id) = self.field_kinds.net_id_of(&kind) else {
            warn!("field {} is not registered, set ignored", V::name());
            return;
        };
        let Ok(payload) = FieldStore::encode(value) else {
            warn!("field {} could not be encoded, set ignored", V::name());
            return;
        };
        self.apply_field(net_id, payload);
    }

    /// The last value applied for the field, or None if it was never set
    pub fn field<V: ReplicatedValue>(&self) -> Option<V> {
        self.fields.get::<V>()
    }

    /// Registers an observer fired on every application of the field,
    /// including the authority's own direct sets
    pub fn on_field_change<V: ReplicatedValue>(
        &mut self,
        callback: impl FnMut(&V) + Send + 'static,
    ) {
        self.fields.on_change(callback);
    }

    // Users

    /// Returns whether or not a User exists for the given UserKey
    pub fn user_exists(&self, user_key: &UserKey) -> bool {
        self.users.contains_key(user_key)
    }

    /// Retrieves an UserRef that exposes read-only operations for the User
    /// associated with the given UserKey.
    /// Panics if the user does not exist.
    pub fn user(&self, user_key: &UserKey) -> UserRef {
        if self.user_exists(user_key) {
            return UserRef::new(self, user_key);
        }
        panic!("No User exists for given Key!");
    }

    /// Retrieves an UserMut that exposes read and write operations for the
    /// User associated with the given UserKey.
    /// Panics if the user does not exist.
    pub fn user_mut(&mut self, user_key: &UserKey) -> UserMut {
        if self.user_exists(user_key) {
            return UserMut::new(self, user_key);
        }
        panic!("No User exists for given Key!");
    }

    /// Return a list of all currently connected Users' keys
    pub fn user_keys(&self) -> Vec<UserKey> {
        self.users
            .iter()
            .filter(|(_, user)| user.is_connected())
            .map(|(user_key, _)| user_key)
            .collect()
    }

    /// Get the number of Users currently connected
    pub fn users_count(&self) -> usize {
        self.users
            .iter()
            .filter(|(_, user)| user.is_connected())
            .count()
    }

    // Ticks

    /// Gets the current tick of the Server
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// The duration between each simulation tick
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    // Crate-public

    pub(crate) fn user_record(&self, user_key: &UserKey) -> &User {
        let Some(user) = self.users.get(user_key) else {
            panic!("No User exists for given Key!");
        };
        user
    }

    // Private

    fn process_packet(&mut self, address: SocketAddr, payload: Vec<u8>) {
        let message = match ClientMessage::from_bytes(&payload) {
            Ok(message) => message,
            Err(error) => {
                warn!("dropping packet from {address}: {error}");
                return;
            }
        };

        match message {
            ClientMessage::RequestJoin { character } => {
                self.receive_join_request(address, character);
            }
            ClientMessage::RequestLeave => {
                let Some(user_key) = self.address_map.get(&address).copied() else {
                    warn!("leave request from unknown address {address} ignored");
                    return;
                };
                self.disconnect_user(&user_key);
            }
            ClientMessage::RequestSpawn { kind, transform } => {
                if !self.sender_is_connected(&address) {
                    warn!("spawn request from non-member {address} ignored");
                    return;
                }
                let kind = match self.entity_kinds.kind_from_net_id(kind.net_id()) {
                    Ok(kind) => kind,
                    Err(error) => {
                        warn!("spawn request from {address} ignored: {error}");
                        return;
                    }
                };
                self.spawn(&kind, transform);
            }
            ClientMessage::RequestUnspawn { handle } => {
                if !self.sender_is_connected(&address) {
                    warn!("unspawn request from non-member {address} ignored");
                    return;
                }
                self.unspawn(&handle);
            }
            ClientMessage::RequestFieldSet { field, payload } => {
                if !self.sender_is_connected(&address) {
                    warn!("field set request from non-member {address} ignored");
                    return;
                }
                self.apply_field(field, payload);
            }
        }
    }

    fn receive_join_request(&mut self, address: SocketAddr, character: CharacterId) {
        if self.address_map.contains_key(&address) {
            warn!("duplicate join request from {address} ignored");
            return;
        }
        if !self.joining_open {
            self.send_to(&address, &ServerMessage::JoinRejected);
            return;
        }

        let user_key = self.users.insert(User::new(address, character));
        self.address_map.insert(address, user_key);

        if self.config.require_join_approval {
            self.incoming_events.push_join(&user_key, character);
        } else {
            self.accept_connection(&user_key);
        }
    }

    fn sender_is_connected(&self, address: &SocketAddr) -> bool {
        self.address_map
            .get(address)
            .and_then(|user_key| self.users.get(user_key))
            .map(|user| user.is_connected())
            .unwrap_or(false)
    }

    fn apply_field(&mut self, net_id: u16, payload: Vec<u8>) {
        match self
            .fields
            .apply(&self.field_kinds, net_id, payload.clone())
        {
            Ok(kind) => {
                self.broadcast(&ServerMessage::AnnounceFieldValue {
                    field: net_id,
                    payload: payload.clone(),
                });
                self.incoming_events.push_field_update(kind, payload);
            }
            Err(error) => {
                warn!("field set ignored: {error}");
            }
        }
    }

    /// Brings a just-accepted member up to the current session state: every
    /// active entity, every applied field value, every present member
    fn send_snapshot(&mut self, address: &SocketAddr) {
        for (handle, transform) in self.pool.active_entities() {
            self.send_to(address, &ServerMessage::AnnounceSpawn { handle, transform });
        }
        for (field, payload) in self.fields.snapshot(&self.field_kinds) {
            self.send_to(address, &ServerMessage::AnnounceFieldValue { field, payload });
        }
        let members: Vec<(SocketAddr, CharacterId)> = self
            .users
            .iter()
            .filter(|(_, user)| user.is_connected() && user.address() != *address)
            .map(|(_, user)| (user.address(), user.character()))
            .collect();
        for (member_address, character) in members {
            self.send_to(
                address,
                &ServerMessage::AnnounceMemberJoined {
                    address: member_address,
                    character,
                },
            );
        }
    }

    fn broadcast(&mut self, message: &ServerMessage) {
        self.broadcast_except(None, message);
    }

    fn broadcast_except(&mut self, except: Option<&SocketAddr>, message: &ServerMessage) {
        if self.io.is_none() {
            return;
        }
        let mut addresses: Vec<SocketAddr> = self
            .users
            .iter()
            .filter(|(_, user)| user.is_connected())
            .map(|(_, user)| user.address())
            .filter(|address| Some(address) != except)
            .collect();

        // shuffle order of sends in order to avoid priority among users
        fastrand::shuffle(&mut addresses);

        for address in addresses {
            self.send_to(&address, message);
        }
    }

    fn send_to(&mut self, address: &SocketAddr, message: &ServerMessage) {
        let Some(io) = &self.io else {
            return;
        };
        let payload = match message.to_bytes() {
            Ok(payload) => payload,
            Err(error) => {
                warn!("announcement could not be encoded: {error}");
                return;
            }
        };
        if io.packet_sender.send(address, &payload).is_err() {
            self.incoming_events
                .push_error(ServerError::Send { address: *address });
        }
    }
}
