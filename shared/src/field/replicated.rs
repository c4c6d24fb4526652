use serde::{de::DeserializeOwned, Serialize};

/// A value kept consistent across participants via authority-gated mutation
/// and broadcast. Implementors are registered with the Protocol via
/// `add_field()` before it is locked.
pub trait ReplicatedValue:
    Serialize + DeserializeOwned + Clone + Send + Sync + Sized + 'static
{
    /// Stable human-readable name, used in logs and error messages
    fn name() -> &'static str;
}

/// Decodes a batch of stored payloads back into values, silently skipping
/// any that no longer decode. Used by the event readers on both sides.
pub fn read_values<V: ReplicatedValue>(payloads: Vec<Vec<u8>>) -> Vec<V> {
    payloads
        .iter()
        .filter_map(|payload| bincode::deserialize(payload).ok())
        .collect()
}
