use std::time::Duration;

use crate::{
    field::{field_kinds::FieldKinds, replicated::ReplicatedValue},
    pool::entity_kinds::{EntityKinds, PoolConfig},
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

// Protocol
#[derive(Debug, PartialEq)]
pub struct Protocol {
    pub entity_kinds: EntityKinds,
    pub field_kinds: FieldKinds,
    /// The duration between each simulation tick
    pub tick_interval: Duration,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            entity_kinds: EntityKinds::new(),
            field_kinds: FieldKinds::new(),
            tick_interval: Duration::from_millis(50),
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    pub fn tick_interval(&mut self, duration: Duration) -> &mut Self {
        self.check_lock();
        self.tick_interval = duration;
        self
    }

    pub fn add_entity_kind(&mut self, name: &'static str, config: PoolConfig) -> &mut Self {
        self.check_lock();
        self.entity_kinds.add_entity_kind(name, config);
        self
    }

    pub fn add_field<V: ReplicatedValue>(&mut self) -> &mut Self {
        self.check_lock();
        self.field_kinds.add_field::<V>();
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(
        &mut self,
        plugin: P,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    pub fn try_tick_interval(&mut self, duration: Duration) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.tick_interval = duration;
        Ok(self)
    }

    pub fn try_add_entity_kind(
        &mut self,
        name: &'static str,
        config: PoolConfig,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.entity_kinds.add_entity_kind(name, config);
        Ok(self)
    }

    pub fn try_add_field<V: ReplicatedValue>(&mut self) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.field_kinds.add_field::<V>();
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<&mut Protocol> for Protocol {
    fn from(other: &mut Protocol) -> Self {
        other.build()
    }
}
