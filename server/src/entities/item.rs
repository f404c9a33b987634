//! Item instances living in the world arena.

use mud_shared::{ItemDef, ItemKind};

use super::{EntityId, ItemId, RoomId};

/// Where an item currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    Room(RoomId),
    Carried(EntityId),
    InCorpse(EntityId),
}

/// An item instance cloned from a template
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    /// Template this instance was cloned from
    pub def_id: u32,
    pub name: String,
    pub kind: ItemKind,
    pub location: ItemLocation,
}

impl Item {
    pub fn from_def(id: ItemId, def: &ItemDef, location: ItemLocation) -> Self {
        Self {
            id,
            def_id: def.id,
            name: def.name.clone(),
            kind: def.kind.clone(),
            location,
        }
    }
}
