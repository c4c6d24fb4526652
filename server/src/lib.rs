//! # Tether Server
//! A session host that owns the authoritative entity pool and replicated
//! state, applies mutation requests from connected clients, and fans out
//! announcements to every member.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tether_shared::{
        resolve_slot, BigMap, BigMapKey, CharacterId, DefaultCharacter, EntityKind, PartyOrder,
        PartyPlugin, PartyRoster, PoolConfig, PoolHandle, Protocol, ReplicatedValue, Tick,
        Transform,
    };
}

pub mod transport {
    pub use tether_shared::transport::{
        channel::PacketChannel,
        server::{PacketReceiver, PacketSender},
        RecvError, SendError,
    };
}

mod error;
mod events;
mod server;
mod user;

pub use error::ServerError;
pub use events::{
    ConnectEvent, DisconnectEvent, ErrorEvent, Event, Events, FieldUpdateEvent, JoinEvent,
    SpawnEvent, TickEvent, UnspawnEvent,
};
pub use server::{Server, ServerConfig};
pub use user::{UserKey, UserMut, UserRef};
