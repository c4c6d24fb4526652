//! # Tether Shared
//! Common functionality shared between tether-server & tether-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bigmap;
mod field;
mod messages;
mod party;
mod pool;
mod protocol;
mod time_queue;
mod transform;
mod types;

pub mod transport;

pub use field::{
    error::FieldError,
    field_kinds::{FieldKind, FieldKinds},
    replicated::{read_values, ReplicatedValue},
    store::FieldStore,
};
pub use messages::{ClientMessage, MessageError, ServerMessage};
pub use party::{
    resolve_slot, CharacterId, DefaultCharacter, PartyOrder, PartyPlugin, PartyRoster,
};
pub use pool::{
    entity_kinds::{EntityKind, EntityKinds, PoolConfig},
    error::PoolError,
    handle::PoolHandle,
    store::PoolStore,
};

pub use bigmap::{BigMap, BigMapKey};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use time_queue::{TimeQueue, TimerKey};
pub use transform::Transform;
pub use types::Tick;
