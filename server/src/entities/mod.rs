//! Server-side entity definitions.

pub mod living;
pub mod player;
mod monster;
mod item;
mod corpse;

pub use living::{capitalize, Living, LivingKind, CombatState, MAX_INTOXICATION};
pub use player::PlayerData;
pub use monster::MonsterData;
pub use item::{Item, ItemLocation};
pub use corpse::Corpse;

/// Id of a living or corpse; both share one id space and one scheduler
pub type EntityId = u64;

/// Id of an item instance
pub type ItemId = u64;

/// Location id owned by the topology collaborator
pub type RoomId = u32;
