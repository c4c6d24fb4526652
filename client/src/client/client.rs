use std::{collections::HashMap, net::SocketAddr, time::Duration};

use log::{info, warn};

use tether_shared::{
    transport::client::{PacketReceiver, PacketSender},
    CharacterId, ClientMessage, EntityKind, EntityKinds, FieldKind, FieldKinds, FieldStore,
    PoolHandle, Protocol, ReplicatedValue, ServerMessage, Transform,
};

use crate::{
    client::ClientConfig, error::ClientError, events::Events, world::EntityMirror,
};

struct Io {
    packet_sender: Box<dyn PacketSender>,
    packet_receiver: Box<dyn PacketReceiver>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    /// Join request sent, waiting for the authority's verdict
    Connecting,
    Connected,
    Rejected,
}

/// A non-authority session participant. Every mutation it wants is forwarded
/// to the authority as a request; local state changes only when the matching
/// announcement arrives.
pub struct Client {
    config: ClientConfig,
    entity_kinds: EntityKinds,
    field_kinds: FieldKinds,
    tick_interval: Duration,
    io: Option<Io>,
    status: ConnectionStatus,
    fields: FieldStore,
    mirror: EntityMirror,
    members: HashMap<SocketAddr, CharacterId>,
    incoming_events: Events,
}

impl Client {
    /// Create a new Client
    pub fn new<P: Into<Protocol>>(client_config: ClientConfig, protocol: P) -> Self {
        // split up protocol
        let protocol: Protocol = protocol.into();
        let Protocol {
            entity_kinds,
            field_kinds,
            tick_interval,
            ..
        } = protocol;

        Self {
            config: client_config,
            entity_kinds,
            field_kinds,
            tick_interval,
            io: None,
            status: ConnectionStatus::Disconnected,
            fields: FieldStore::new(),
            mirror: EntityMirror::new(),
            members: HashMap::new(),
            incoming_events: Events::new(),
        }
    }

    /// Attaches the transport and sends the join request
    pub fn connect(
        &mut self,
        packet_sender: Box<dyn PacketSender>,
        packet_receiver: Box<dyn PacketReceiver>,
    ) {
        if self.io.is_some() {
            warn!("connect ignored: Client is already connected");
            return;
        }
        self.io = Some(Io {
            packet_sender,
            packet_receiver,
        });
        self.status = ConnectionStatus::Connecting;
        let character = self.config.character;
        if let Some(address) = self.server_addr() {
            info!("Client requesting to join the session at {address}");
        }
        self.send(&ClientMessage::RequestJoin { character });
    }

    /// Announces the departure to the authority and detaches the transport.
    /// Mirrored state is cleared; it was only ever valid while connected.
    pub fn disconnect(&mut self) {
        if self.io.is_none() {
            warn!("disconnect ignored: Client is not connected");
            return;
        }
        self.send(&ClientMessage::RequestLeave);
        self.io = None;
        self.status = ConnectionStatus::Disconnected;
        self.mirror.clear();
        self.members.clear();
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Must be called regularly: drains the transport, applies every
    /// announcement to the local mirrors, and returns the events produced
    /// since last call
    pub fn receive(&mut self) -> Events {
        let mut packets: Vec<Vec<u8>> = Vec::new();
        if let Some(io) = &mut self.io {
            loop {
                match io.packet_receiver.receive() {
                    Ok(Some(payload)) => {
                        packets.push(payload.to_vec());
                    }
                    Ok(None) => break,
                    Err(_) => {
                        self.incoming_events.push_error(ClientError::Recv);
                        break;
                    }
                }
            }
        }

        for payload in packets {
            self.process_packet(payload);
        }

        // return all received events and reset the buffer
        std::mem::replace(&mut self.incoming_events, Events::new())
    }

    // Requests (forwarded to the authority, never applied locally)

    /// Asks the authority to spawn an entity of the kind. The local mirror
    /// is untouched until the spawn announcement arrives
    pub fn request_spawn(&mut self, kind: &EntityKind, transform: Transform) {
        if self.entity_kinds.kind_from_net_id(kind.net_id()).is_err() {
            warn!("spawn request ignored: kind is not registered");
            return;
        }
        self.send(&ClientMessage::RequestSpawn {
            kind: *kind,
            transform,
        });
    }

    /// Asks the authority to unspawn the entity
    pub fn request_unspawn(&mut self, handle: &PoolHandle) {
        self.send(&ClientMessage::RequestUnspawn { handle: *handle });
    }

    /// Asks the authority to set a replicated field. The local value is
    /// untouched until the field announcement arrives
    pub fn request_field_set<V: ReplicatedValue>(&mut self, value: &V) {
        let kind = FieldKind::of::<V>();
        let Ok(net_id) = self.field_kinds.net_id_of(&kind) else {
            warn!("field {} is not registered, request ignored", V::name());
            return;
        };
        let Ok(payload) = FieldStore::encode(value) else {
            warn!("field {} could not be encoded, request ignored", V::name());
            return;
        };
        self.send(&ClientMessage::RequestFieldSet {
            field: net_id,
            payload,
        });
    }

    // Replicated fields (read-only mirror)

    /// The last value announced for the field, or None if no announcement
    /// has arrived yet
    pub fn field<V: ReplicatedValue>(&self) -> Option<V> {
        self.fields.get::<V>()
    }

    /// Registers an observer fired on every applied field announcement
    pub fn on_field_change<V: ReplicatedValue>(
        &mut self,
        callback: impl FnMut(&V) + Send + 'static,
    ) {
        self.fields.on_change(callback);
    }

    // Entities (read-only mirror)

    pub fn is_spawned(&self, handle: &PoolHandle) -> bool {
        self.mirror.is_spawned(handle)
    }

    pub fn entity_transform(&self, handle: &PoolHandle) -> Option<Transform> {
        self.mirror.transform(handle)
    }

    /// Every entity currently mirrored as spawned, with its transform
    pub fn entities(&self) -> Vec<(PoolHandle, Transform)> {
        self.mirror.entities()
    }

    pub fn active_count(&self, kind: &EntityKind) -> usize {
        self.mirror.count_of(kind)
    }

    /// Looks up a registered entity kind by its protocol name
    pub fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        self.entity_kinds.kind_by_name(name)
    }

    // Session members

    /// Every other member currently in the session, as announced by the
    /// authority. No ordering guarantee.
    pub fn members(&self) -> Vec<(SocketAddr, CharacterId)> {
        self.members
            .iter()
            .map(|(address, character)| (*address, *character))
            .collect()
    }

    pub fn members_count(&self) -> usize {
        self.members.len()
    }

    /// The duration between each simulation tick
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    // Private

    fn process_packet(&mut self, payload: Vec<u8>) {
        let message = match ServerMessage::from_bytes(&payload) {
            Ok(message) => message,
            Err(error) => {
                warn!("dropping packet from server: {error}");
                return;
            }
        };

        match message {
            ServerMessage::JoinAccepted => {
                self.status = ConnectionStatus::Connected;
                let server_addr = self.server_addr();
                if let Some(address) = server_addr {
                    self.incoming_events.push_connection(address);
                }
            }
            ServerMessage::JoinRejected => {
                self.status = ConnectionStatus::Rejected;
                let server_addr = self.server_addr();
                self.io = None;
                if let Some(address) = server_addr {
                    self.incoming_events.push_rejection(address);
                }
            }
            ServerMessage::AnnounceSpawn { handle, transform } => {
                self.mirror.insert(handle, transform);
                self.incoming_events.push_spawn(&handle, transform);
            }
            ServerMessage::AnnounceUnspawn { handle } => {
                if !self.mirror.remove(&handle) {
                    warn!("unspawn announcement for unknown handle dropped");
                    return;
                }
                self.incoming_events.push_unspawn(&handle);
            }
            ServerMessage::AnnounceFieldValue { field, payload } => {
                match self.fields.apply(&self.field_kinds, field, payload.clone()) {
                    Ok(kind) => {
                        self.incoming_events.push_field_update(kind, payload);
                    }
                    Err(error) => {
                        warn!("field announcement dropped: {error}");
                    }
                }
            }
            ServerMessage::AnnounceMemberJoined { address, character } => {
                self.members.insert(address, character);
                self.incoming_events.push_member_join(address, character);
            }
            ServerMessage::AnnounceMemberLeft { address } => {
                if self.members.remove(&address).is_none() {
                    warn!("member left announcement for unknown address {address} dropped");
                    return;
                }
                self.incoming_events.push_member_leave(address);
            }
        }
    }

    fn server_addr(&self) -> Option<SocketAddr> {
        self.io.as_ref().map(|io| io.packet_sender.server_addr())
    }

    fn send(&mut self, message: &ClientMessage) {
        let Some(io) = &self.io else {
            self.incoming_events.push_error(ClientError::NotConnected);
            return;
        };
        let payload = match message.to_bytes() {
            Ok(payload) => payload,
            Err(error) => {
                warn!("request could not be encoded: {error}");
                return;
            }
        };
        if io.packet_sender.send(&payload).is_err() {
            self.incoming_events.push_error(ClientError::Send);
        }
    }
}
