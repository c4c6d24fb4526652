
pub use session::{client_addr, exchange, join_client, server_addr, start_server, start_server_with_config};
