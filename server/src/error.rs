//! Error types for engine entry points.

use thiserror::Error;

use crate::entities::{EntityId, ItemId};

/// Errors returned by engine operations that can be refused.
/// Misses and failed skill rolls are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no such entity: {0}")]
    UnknownEntity(EntityId),

    #[error("no such item: {0}")]
    UnknownItem(ItemId),

    #[error("invalid target")]
    InvalidTarget,

    #[error("not enough mana (need {needed}, have {available})")]
    ResourceExhausted { needed: u32, available: u32 },

    #[error("you are not carrying that")]
    NotCarried,

    #[error("that is not a weapon")]
    NotAWeapon,

    #[error("that is not armor")]
    NotArmor,

    #[error("you are already wearing something on your {0}")]
    SlotOccupied(String),

    #[error("you are not wearing anything on your {0}")]
    SlotEmpty(String),

    #[error("you are not wielding anything")]
    NothingWielded,

    #[error("you can't drink that")]
    NotDrinkable,

    #[error("no such spell")]
    UnknownSpell,

    #[error("you don't know that spell")]
    SpellNotKnown,

    #[error("you can't train {0}")]
    SkillNotAllowed(String),

    #[error("you need at least {required} {skill} skill")]
    SkillTooLow { skill: String, required: u32 },

    #[error("no such guild: {0}")]
    UnknownGuild(String),

    #[error("you are already a member of the {0}")]
    AlreadyMember(String),

    #[error("you are not a member of the {0}")]
    NotMember(String),

    #[error("members of the {0} cannot join the {1}")]
    GuildConflict(String, String),
}

pub type EngineResult<T> = Result<T, EngineError>;
