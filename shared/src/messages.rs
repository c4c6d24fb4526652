use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    party::CharacterId,
    pool::{entity_kinds::EntityKind, handle::PoolHandle},
    transform::Transform,
};

/// Mutation requests sent from a non-authority participant to the authority.
/// The sender never mutates local state; it waits for the matching
/// announcement instead.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ClientMessage {
    RequestJoin {
        character: CharacterId,
    },
    RequestLeave,
    RequestSpawn {
        kind: EntityKind,
        transform: Transform,
    },
    RequestUnspawn {
        handle: PoolHandle,
    },
    RequestFieldSet {
        field: u16,
        payload: Vec<u8>,
    },
}

/// Announcements fanned out by the authority to every connected participant,
/// in the order the authority applied them. Per-connection order is
/// preserved; there is no cross-field ordering guarantee.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ServerMessage {
    JoinAccepted,
    JoinRejected,
    AnnounceSpawn {
        handle: PoolHandle,
        transform: Transform,
    },
    AnnounceUnspawn {
        handle: PoolHandle,
    },
    AnnounceFieldValue {
        field: u16,
        payload: Vec<u8>,
    },
    AnnounceMemberJoined {
        address: SocketAddr,
        character: CharacterId,
    },
    AnnounceMemberLeft {
        address: SocketAddr,
    },
}

/// Errors that can occur while encoding or decoding wire messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Packet payload could not be decoded as a message
    #[error("Packet of {length} bytes could not be decoded as a message. The packet is dropped with no state change")]
    DecodeFailed { length: usize },

    /// Message could not be encoded for transmission
    #[error("Message could not be encoded for transmission")]
    EncodeFailed,
}

impl ClientMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        bincode::serialize(self).map_err(|_| MessageError::EncodeFailed)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, MessageError> {
        bincode::deserialize(payload).map_err(|_| MessageError::DecodeFailed {
            length: payload.len(),
        })
    }
}

impl ServerMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        bincode::serialize(self).map_err(|_| MessageError::EncodeFailed)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, MessageError> {
        bincode::deserialize(payload).map_err(|_| MessageError::DecodeFailed {
            length: payload.len(),
        })
    }
}
