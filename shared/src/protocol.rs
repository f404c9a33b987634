//! Event definitions emitted by the engine for transport collaborators.

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds per logical tick (one heartbeat)
pub const DEFAULT_TICK_MILLIS: u64 = 2000;

/// Room id of the holding state dead players are moved to
pub const NETHERWORLD_ROOM: u32 = 0;

/// Room id players return to when resurrecting
pub const RESPAWN_ROOM: u32 = 1;

// =============================================================================
// Game Events
// =============================================================================

/// Notifications produced by the engine.
/// The core never talks to sockets; a collaborator drains and delivers these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Text for a single entity
    Message {
        to: u64,
        text: String,
    },
    /// Text for everyone in a room except the excluded entities
    RoomMessage {
        room: u32,
        text: String,
        exclude: Vec<u64>,
    },
    /// A landed attack
    DamageEvent {
        attacker_id: u64,
        target_id: u64,
        damage: u32,
        target_new_health: u32,
    },
    /// An attack that missed
    MissEvent {
        attacker_id: u64,
        target_id: u64,
    },
    /// An entity died
    EntityDeath {
        entity_id: u64,
        killer_id: Option<u64>,
    },
    /// A corpse appeared in a room
    CorpseSpawn {
        corpse_id: u64,
        room: u32,
        name: String,
    },
    /// A corpse decayed or was buried
    CorpseDespawn {
        corpse_id: u64,
    },
}

impl GameEvent {
    pub fn message(to: u64, text: impl Into<String>) -> Self {
        Self::Message { to, text: text.into() }
    }

    pub fn room(room: u32, text: impl Into<String>, exclude: &[u64]) -> Self {
        Self::RoomMessage {
            room,
            text: text.into(),
            exclude: exclude.to_vec(),
        }
    }
}
