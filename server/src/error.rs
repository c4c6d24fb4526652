use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced through the Server's [`ErrorEvent`](crate::ErrorEvent)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// Server has no transport attached
    #[error("Server is not listening. Call listen() with a transport before receive()")]
    NotListening,

    /// Transport failed while receiving
    #[error("Failed to receive packet from the transport")]
    Recv,

    /// Transport failed while sending to a client
    #[error("Failed to send packet to {address}")]
    Send { address: SocketAddr },
}
