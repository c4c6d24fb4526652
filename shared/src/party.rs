use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    field::replicated::ReplicatedValue,
    pool::entity_kinds::PoolConfig,
    protocol::{Protocol, ProtocolPlugin},
};

/// Identifies a playable character across the whole session
#[derive(Serialize, Deserialize, Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub struct CharacterId(pub u16);

/// The set of characters currently recruited to the party
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PartyRoster(pub Vec<CharacterId>);

impl ReplicatedValue for PartyRoster {
    fn name() -> &'static str {
        "PartyRoster"
    }
}

/// One roster index per party slot. Must not be longer than the roster;
/// a dangling index resolves to the default character.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PartyOrder(pub Vec<u8>);

impl ReplicatedValue for PartyOrder {
    fn name() -> &'static str {
        "PartyOrder"
    }
}

/// The character a slot falls back to when its roster entry is missing
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DefaultCharacter(pub CharacterId);

impl ReplicatedValue for DefaultCharacter {
    fn name() -> &'static str {
        "DefaultCharacter"
    }
}

/// Resolves a party slot to a character. An out-of-range slot or a dangling
/// roster index falls back to the default character with a logged warning;
/// callers never see an error.
pub fn resolve_slot(
    roster: &PartyRoster,
    order: &PartyOrder,
    default: &DefaultCharacter,
    slot: usize,
) -> CharacterId {
    let Some(roster_index) = order.0.get(slot) else {
        warn!(
            "party slot {slot} is beyond the current order of {} slots, using default character",
            order.0.len()
        );
        return default.0;
    };
    let Some(character) = roster.0.get(*roster_index as usize) else {
        warn!(
            "party slot {slot} points at roster index {roster_index}, but the roster has {} entries, using default character",
            roster.0.len()
        );
        return default.0;
    };
    *character
}

/// Registers the replicated party fields and the stock entity pools
pub struct PartyPlugin;

impl ProtocolPlugin for PartyPlugin {
    fn build(&self, protocol: &mut Protocol) {
        protocol
            .add_field::<PartyRoster>()
            .add_field::<PartyOrder>()
            .add_field::<DefaultCharacter>()
            .add_entity_kind("projectile", PoolConfig::new(16, 64))
            .add_entity_kind("enemy", PoolConfig::new(8, 32))
            .add_entity_kind("pickup", PoolConfig::new(8, 32));
    }
}
