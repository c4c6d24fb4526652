use std::default::Default;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Determines whether the application must explicitly accept each join
    /// request. When false, join requests are accepted as they arrive.
    pub require_join_approval: bool,
    /// Whether the session starts with joining open. Join requests received
    /// while joining is closed are rejected without surfacing an event.
    pub joining_open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_join_approval: true,
            joining_open: true,
        }
    }
}
