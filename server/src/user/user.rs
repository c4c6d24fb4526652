use std::net::SocketAddr;

use tether_shared::{BigMapKey, CharacterId};

use crate::server::Server;

// UserKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct UserKey(u64);

impl BigMapKey for UserKey {
    fn to_u64(&self) -> u64 {
        self.0
    }

    fn from_u64(value: u64) -> Self {
        UserKey(value)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum UserStatus {
    /// Join request received, waiting for the application to accept/reject
    Pending,
    Connected,
}

// User
pub(crate) struct User {
    address: SocketAddr,
    character: CharacterId,
    status: UserStatus,
}

impl User {
    pub(crate) fn new(address: SocketAddr, character: CharacterId) -> Self {
        Self {
            address,
            character,
            status: UserStatus::Pending,
        }
    }

    pub(crate) fn address(&self) -> SocketAddr {
        self.address
    }

    pub(crate) fn character(&self) -> CharacterId {
        self.character
    }

    pub(crate) fn status(&self) -> UserStatus {
        self.status
    }

    pub(crate) fn set_connected(&mut self) {
        self.status = UserStatus::Connected;
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.status == UserStatus::Connected
    }
}

// UserRef

pub struct UserRef<'s> {
    server: &'s Server,
    key: UserKey,
}

impl<'s> UserRef<'s> {
    pub(crate) fn new(server: &'s Server, key: &UserKey) -> Self {
        Self { server, key: *key }
    }

    pub fn key(&self) -> UserKey {
        self.key
    }

    pub fn address(&self) -> SocketAddr {
        self.server.user_record(&self.key).address()
    }

    pub fn character(&self) -> CharacterId {
        self.server.user_record(&self.key).character()
    }
}

// UserMut
pub struct UserMut<'s> {
    server: &'s mut Server,
    key: UserKey,
}

impl<'s> UserMut<'s> {
    pub(crate) fn new(server: &'s mut Server, key: &UserKey) -> Self {
        Self { server, key: *key }
    }

    pub fn key(&self) -> UserKey {
        self.key
    }

    pub fn address(&self) -> SocketAddr {
        self.server.user_record(&self.key).address()
    }

    pub fn character(&self) -> CharacterId {
        self.server.user_record(&self.key).character()
    }

    pub fn disconnect(&mut self) {
        self.server.disconnect_user(&self.key);
    }
}
