pub mod channel;

pub struct SendError;

pub struct RecvError;

/// Transport surface used by the authority side of a session
pub mod server {
    use std::net::SocketAddr;

    use super::{RecvError, SendError};

    pub trait PacketSender: Send + Sync {
        /// Sends a packet to the client at the given address
        fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError>;
    }

    pub trait PacketReceiver: Send + Sync {
        /// Receives a packet from any connected client
        fn receive(&mut self) -> Result<Option<(SocketAddr, &[u8])>, RecvError>;
    }
}

/// Transport surface used by the non-authority side of a session
pub mod client {
    use std::net::SocketAddr;

    use super::{RecvError, SendError};

    pub trait PacketSender: Send + Sync {
        /// Sends a packet to the Server
        fn send(&self, payload: &[u8]) -> Result<(), SendError>;
        /// Get the Server's Socket address
        fn server_addr(&self) -> SocketAddr;
    }

    pub trait PacketReceiver: Send + Sync {
        /// Receives a packet from the Server
        fn receive(&mut self) -> Result<Option<&[u8]>, RecvError>;
        /// Get the Server's Socket address
        fn server_addr(&self) -> SocketAddr;
    }
}
