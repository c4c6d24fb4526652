mod client;
mod client_config;

pub use client::{Client, ConnectionStatus};
pub use client_config::ClientConfig;
