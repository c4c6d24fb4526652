use thiserror::Error;

/// Errors surfaced through the Client's [`ErrorEvent`](crate::ErrorEvent)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Client has no transport attached
    #[error("Client is not connected. Call connect() with a transport first")]
    NotConnected,

    /// Transport failed while receiving
    #[error("Failed to receive packet from the transport")]
    Recv,

    /// Transport failed while sending to the server
    #[error("Failed to send packet to the server")]
    Send,
}
