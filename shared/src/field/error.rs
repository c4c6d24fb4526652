use thiserror::Error;

/// Errors that can occur during replicated field operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Network ID not found in registry
    #[error("Network ID {net_id} not found in field registry. Field type must be registered with Protocol via add_field()")]
    NetIdNotFound { net_id: u16 },

    /// Field kind not found in registry
    #[error("Field kind not found in registry. Field type must be registered with Protocol via add_field()")]
    FieldKindNotFound,

    /// Payload could not be decoded as the field's value type
    #[error("Payload of {length} bytes could not be decoded as a {field} value. The payload is dropped with no state change")]
    DecodeFailed { field: String, length: usize },

    /// Value could not be encoded for transmission
    #[error("A {field} value could not be encoded for transmission")]
    EncodeFailed { field: String },
}
