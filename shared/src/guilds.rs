//! Guild catalogue.
//!
//! Joining a guild is how a player's trainable skill set grows beyond the
//! basic skills. Members join and leave in the guild's hall.

use serde::{Deserialize, Serialize};

/// Room id of the Fighters Guild hall
pub const FIGHTERS_HALL: u32 = 6;
/// Room id of the Mages Guild tower
pub const MAGES_HALL: u32 = 7;
/// Room id of the Healers Guild temple
pub const HEALERS_HALL: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildDef {
    /// Stable key stored in player saves
    pub key: String,
    pub name: String,
    pub hall: u32,
    /// Skills members may train
    pub granted_skills: Vec<String>,
    /// Spell ids taught on joining and forgotten on leaving
    pub granted_spells: Vec<u32>,
    /// Keys of guilds whose members may not join this one
    pub conflicts: Vec<String>,
    pub welcome: String,
    pub farewell: String,
}

impl GuildDef {
    /// Conflicts hold in both directions
    pub fn conflicts_with(&self, other: &GuildDef) -> bool {
        self.conflicts.contains(&other.key) || other.conflicts.contains(&self.key)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Built-in guilds
pub fn get_guild_definitions() -> Vec<GuildDef> {
    vec![
        GuildDef {
            key: "fighters".into(),
            name: "Fighters Guild".into(),
            hall: FIGHTERS_HALL,
            granted_skills: strings(&["sword", "axe", "mace", "club", "dagger", "shield_block", "parry"]),
            granted_spells: Vec::new(),
            conflicts: Vec::new(),
            welcome: "The veteran clasps your forearm. \"Welcome, warrior. Train hard and fight with honor.\"".into(),
            farewell: "The veteran grunts and turns back to his desk.".into(),
        },
        GuildDef {
            key: "mages".into(),
            name: "Mages Guild".into(),
            hall: MAGES_HALL,
            granted_skills: strings(&["evocation", "conjuration", "transmutation"]),
            granted_spells: vec![1, 2],
            conflicts: strings(&["healers"]),
            welcome: "The wizard bows slightly. \"Welcome, apprentice. Let the arcane arts guide you.\"".into(),
            farewell: "The wizard sighs. \"The knowledge fades from your mind...\"".into(),
        },
        GuildDef {
            key: "healers".into(),
            name: "Healers Guild".into(),
            hall: HEALERS_HALL,
            granted_skills: strings(&["abjuration", "divination"]),
            granted_spells: vec![11, 12],
            conflicts: Vec::new(),
            welcome: "The priestess places a hand on your shoulder. \"Welcome, child. May you bring comfort to those in need.\"".into(),
            farewell: "The priestess nods sadly. \"Go with peace, but the sacred knowledge must remain here.\"".into(),
        },
    ]
}

pub fn get_guild(key: &str) -> Option<GuildDef> {
    let key = key.to_lowercase();
    get_guild_definitions().into_iter().find(|g| g.key == key)
}

/// The guild whose hall is `room`, if any
pub fn guild_in_room(room: u32) -> Option<GuildDef> {
    get_guild_definitions().into_iter().find(|g| g.hall == room)
}
