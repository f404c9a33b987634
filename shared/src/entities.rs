//! Shared entity definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The seven primary attributes of a living
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    Str,
    Dex,
    Agi,
    Con,
    Int,
    Wis,
    Cha,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Str,
        Stat::Dex,
        Stat::Agi,
        Stat::Con,
        Stat::Int,
        Stat::Wis,
        Stat::Cha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Str => "strength",
            Self::Dex => "dexterity",
            Self::Agi => "agility",
            Self::Con => "constitution",
            Self::Int => "intelligence",
            Self::Wis => "wisdom",
            Self::Cha => "charisma",
        }
    }

    /// Parse the short or long form ("str", "strength")
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stat| stat.name() == lower || (lower.len() >= 3 && stat.name().starts_with(&lower)))
    }
}

/// Stat block. Every stat starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub str: u32,
    pub dex: u32,
    pub agi: u32,
    pub con: u32,
    pub int: u32,
    pub wis: u32,
    pub cha: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            str: 1,
            dex: 1,
            agi: 1,
            con: 1,
            int: 1,
            wis: 1,
            cha: 1,
        }
    }
}

impl Stats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Str => self.str,
            Stat::Dex => self.dex,
            Stat::Agi => self.agi,
            Stat::Con => self.con,
            Stat::Int => self.int,
            Stat::Wis => self.wis,
            Stat::Cha => self.cha,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Str => self.str = value,
            Stat::Dex => self.dex = value,
            Stat::Agi => self.agi = value,
            Stat::Con => self.con = value,
            Stat::Int => self.int = value,
            Stat::Wis => self.wis = value,
            Stat::Cha => self.cha = value,
        }
    }

    /// Maximum hit points derived from constitution
    pub fn max_hp(&self) -> u32 {
        self.con.saturating_mul(5).saturating_add(10)
    }

    /// Maximum mana derived from intelligence
    pub fn max_mana(&self) -> u32 {
        self.int.saturating_mul(5).saturating_add(10)
    }
}

// =============================================================================
// Monster Templates
// =============================================================================

/// Monster template used to spawn autonomous actors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub short: String,
    pub stats: Stats,
    pub aggressive: bool,
    pub xp_value: u64,
    /// Independent per-item drop chance in percent (0-100)
    pub drop_chance: u32,
    /// Item template ids that may drop on death
    pub drops: Vec<u32>,
}

/// Built-in monster templates
pub fn get_monster_templates() -> Vec<MonsterTemplate> {
    vec![
        MonsterTemplate {
            name: "rat".into(),
            short: "a mangy rat".into(),
            stats: Stats { str: 1, dex: 2, agi: 2, ..Stats::default() },
            aggressive: false,
            xp_value: 5,
            drop_chance: 30,
            drops: vec![10],
        },
        MonsterTemplate {
            name: "goblin".into(),
            short: "a snarling goblin".into(),
            stats: Stats { str: 2, dex: 3, agi: 3, con: 2, ..Stats::default() },
            aggressive: true,
            xp_value: 15,
            drop_chance: 40,
            drops: vec![3],
        },
        MonsterTemplate {
            name: "wolf".into(),
            short: "a grey wolf".into(),
            stats: Stats { str: 3, dex: 3, agi: 4, con: 4, ..Stats::default() },
            aggressive: true,
            xp_value: 20,
            drop_chance: 50,
            drops: vec![11, 23],
        },
        MonsterTemplate {
            name: "troll".into(),
            short: "a massive cave troll".into(),
            stats: Stats { str: 6, dex: 2, agi: 1, con: 10, ..Stats::default() },
            aggressive: true,
            xp_value: 50,
            drop_chance: 60,
            drops: vec![4, 24],
        },
    ]
}

pub fn find_monster_template(name: &str) -> Option<MonsterTemplate> {
    get_monster_templates().into_iter().find(|t| t.name == name)
}

// =============================================================================
// Player Persistence
// =============================================================================

/// Player state that persists across sessions.
/// Items are stored as template ids and rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub name: String,
    pub room: Option<u32>,
    pub stats: Stats,
    pub hp: u32,
    pub mana: u32,
    pub intoxication: u32,
    pub xp: u64,
    /// Guild keys in join order
    #[serde(default)]
    pub guilds: Vec<String>,
    pub skills: BTreeMap<String, u32>,
    pub allowed_skills: Vec<String>,
    pub known_spells: Vec<u32>,
    /// Carried item template ids (not including equipped items)
    pub inventory: Vec<u32>,
    pub wielded: Option<u32>,
    pub worn: Vec<u32>,
}
