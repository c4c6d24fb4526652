use std::collections::HashMap;

use log::warn;

use crate::field::{
    error::FieldError,
    field_kinds::{FieldKind, FieldKinds},
    replicated::ReplicatedValue,
};

/// Callback invoked with the encoded payload of a freshly applied value.
/// Payloads are validated before observers run, so decoding cannot fail.
type Observer = Box<dyn FnMut(&[u8]) + Send>;

/// Holds the last applied value of every replicated field, plus the
/// observers to notify when a field changes.
///
/// On the authority this backs the authoritative values; on every other
/// participant it is a read-only mirror overwritten, last write wins, by each
/// field announcement in arrival order.
pub struct FieldStore {
    values: HashMap<FieldKind, Vec<u8>>,
    observers: HashMap<FieldKind, Vec<Observer>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            observers: HashMap::new(),
        }
    }

    /// The last value this participant applied, or None if the field has
    /// never been applied here
    pub fn get<V: ReplicatedValue>(&self) -> Option<V> {
        let payload = self.values.get(&FieldKind::of::<V>())?;
        match bincode::deserialize(payload) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    "stored payload for field {} failed to decode",
                    V::name()
                );
                None
            }
        }
    }

    /// Registers a callback fired synchronously on every applied value, in
    /// registration order, exactly once per application
    pub fn on_change<V: ReplicatedValue>(&mut self, mut callback: impl FnMut(&V) + Send + 'static) {
        let observer: Observer = Box::new(move |payload| {
            if let Ok(value) = bincode::deserialize::<V>(payload) {
                callback(&value);
            }
        });
        self.observers
            .entry(FieldKind::of::<V>())
            .or_default()
            .push(observer);
    }

    /// Validates, stores, and fans out an incoming payload. A payload that
    /// fails to decode, or references an unregistered field, leaves the
    /// store untouched.
    pub fn apply(
        &mut self,
        field_kinds: &FieldKinds,
        net_id: u16,
        payload: Vec<u8>,
    ) -> Result<FieldKind, FieldError> {
        let kind = field_kinds.kind_from_net_id(net_id)?;
        if !field_kinds.validate(&kind, &payload) {
            return Err(FieldError::DecodeFailed {
                field: field_kinds.name_of(&kind).to_string(),
                length: payload.len(),
            });
        }

        self.values.insert(kind, payload.clone());

        if let Some(observers) = self.observers.get_mut(&kind) {
            for observer in observers.iter_mut() {
                observer(&payload);
            }
        }

        Ok(kind)
    }

    /// Encodes a value for transmission
    pub fn encode<V: ReplicatedValue>(value: &V) -> Result<Vec<u8>, FieldError> {
        bincode::serialize(value).map_err(|_| FieldError::EncodeFailed {
            field: V::name().to_string(),
        })
    }

    /// Every field applied so far, as (net ID, payload) pairs. Used to bring
    /// a late joiner up to the current values. No cross-field ordering
    /// guarantee.
    pub fn snapshot(&self, field_kinds: &FieldKinds) -> Vec<(u16, Vec<u8>)> {
        let mut output = Vec::new();
        for (kind, payload) in &self.values {
            match field_kinds.net_id_of(kind) {
                Ok(net_id) => output.push((net_id, payload.clone())),
                Err(_) => warn!("field missing from registry during snapshot"),
            }
        }
        output
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}
