//! # Tether Client
//! A session client that forwards mutation requests to the authority and
//! maintains read-only mirrors of the entity pool and replicated state.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        resolve_slot, CharacterId, DefaultCharacter, EntityKind, PartyOrder, PartyPlugin,
        PartyRoster, PoolConfig, PoolHandle, Protocol, ReplicatedValue, Tick, Transform,
    };
}

pub mod transport {
    pub use tether_shared::transport::{
        channel::PacketChannel,
        client::{PacketReceiver, PacketSender},
        RecvError, SendError,
    };
}

mod client;
mod error;
mod events;
mod world;

pub use client::{Client, ClientConfig, ConnectionStatus};
pub use error::ClientError;
pub use events::{
    ConnectEvent, ErrorEvent, Event, Events, FieldUpdateEvent, MemberJoinEvent, MemberLeaveEvent,
    RejectEvent, SpawnEvent, UnspawnEvent,
};
pub use world::EntityMirror;
