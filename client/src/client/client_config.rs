use std::default::Default;

use tether_shared::CharacterId;

/// Contains Config properties which will be used by the Client
#[derive(Clone)]
pub struct ClientConfig {
    /// The character this client asks to join the session as
    pub character: CharacterId,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            character: CharacterId(0),
        }
    }
}
