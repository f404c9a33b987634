//! The living record shared by players, monsters and generic actors.
//!
//! Kind-specific state lives in [`LivingKind`] so a single arena can hold
//! every living and death handling can dispatch on the tag.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use mud_shared::{is_basic_skill, Stat, Stats};

use super::{EntityId, ItemId, MonsterData, PlayerData, RoomId};

/// Maximum intoxication a living can carry
pub const MAX_INTOXICATION: u32 = 100;

/// Upper-case the first character, for text that starts a sentence
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatState {
    Idle,
    Engaged,
}

/// Per-kind extension data
#[derive(Debug, Clone)]
pub enum LivingKind {
    Generic,
    Monster(MonsterData),
    Player(PlayerData),
}

#[derive(Debug, Clone)]
pub struct Living {
    pub id: EntityId,
    pub name: String,
    pub short: String,
    /// Location supplied by the topology collaborator
    pub room: Option<RoomId>,
    stats: Stats,
    hp: u32,
    max_hp: u32,
    mana: u32,
    max_mana: u32,
    intoxication: u32,
    pub combat_state: CombatState,
    /// Weak reference by id; re-resolved every tick
    pub attacker: Option<EntityId>,
    /// Baseline HP regained per idle tick
    pub regen_rate: u32,
    pub wielded: Option<ItemId>,
    /// Slot name to armor item, one per slot
    pub worn: BTreeMap<String, ItemId>,
    pub inventory: Vec<ItemId>,
    skills: HashMap<String, u32>,
    /// Empty means unrestricted
    pub allowed_skills: BTreeSet<String>,
    pub known_spells: BTreeSet<u32>,
    /// Set when death fires; cleared only for kinds that come back
    pub dead: bool,
    pub kind: LivingKind,
}

impl Living {
    pub fn new(id: EntityId, name: impl Into<String>, kind: LivingKind) -> Self {
        let name = name.into();
        let stats = Stats::default();
        Self {
            id,
            short: name.clone(),
            name,
            room: None,
            stats,
            hp: stats.max_hp(),
            max_hp: stats.max_hp(),
            mana: stats.max_mana(),
            max_mana: stats.max_mana(),
            intoxication: 0,
            combat_state: CombatState::Idle,
            attacker: None,
            regen_rate: 1,
            wielded: None,
            worn: BTreeMap::new(),
            inventory: Vec::new(),
            skills: HashMap::new(),
            allowed_skills: BTreeSet::new(),
            known_spells: BTreeSet::new(),
            dead: false,
            kind,
        }
    }

    /// Create a living with a full stat block, starting at full HP and mana
    pub fn with_stats(id: EntityId, name: impl Into<String>, kind: LivingKind, stats: Stats) -> Self {
        let mut living = Self::new(id, name, kind);
        living.stats = stats;
        living.max_hp = stats.max_hp();
        living.max_mana = stats.max_mana();
        living.hp = living.max_hp;
        living.mana = living.max_mana;
        living
    }

    // =========================================================================
    // Stats
    // =========================================================================

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.get(stat)
    }

    /// Set a stat, re-deriving max HP on CON and max mana on INT.
    /// Current values are only clamped if they exceed the new maximum.
    pub fn set_stat(&mut self, stat: Stat, value: u32) {
        self.stats.set(stat, value);
        match stat {
            Stat::Con => {
                self.max_hp = self.stats.max_hp();
                self.hp = self.hp.min(self.max_hp);
            }
            Stat::Int => {
                self.max_mana = self.stats.max_mana();
                self.mana = self.mana.min(self.max_mana);
            }
            _ => {}
        }
    }

    // =========================================================================
    // Hit points and mana
    // =========================================================================

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn set_hp(&mut self, value: u32) {
        self.hp = value.min(self.max_hp);
    }

    /// Heal, capped at max HP. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Lose HP, floored at zero. Returns the new HP.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn set_mana(&mut self, value: u32) {
        self.mana = value.min(self.max_mana);
    }

    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.mana - before
    }

    /// Spend mana if enough is available
    pub fn use_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && self.hp > 0
    }

    // =========================================================================
    // Intoxication
    // =========================================================================

    pub fn intoxication(&self) -> u32 {
        self.intoxication
    }

    /// Adjust intoxication by a signed amount, clamped to `0..=100`
    pub fn adjust_intoxication(&mut self, amount: i32) -> u32 {
        let value = (self.intoxication as i64 + amount as i64).clamp(0, MAX_INTOXICATION as i64);
        self.intoxication = value as u32;
        self.intoxication
    }

    // =========================================================================
    // Skills
    // =========================================================================

    pub fn skill(&self, name: &str) -> u32 {
        self.skills.get(name).copied().unwrap_or(0)
    }

    pub fn set_skill(&mut self, name: &str, value: u32) {
        self.skills.insert(name.to_string(), value);
    }

    pub fn skills(&self) -> &HashMap<String, u32> {
        &self.skills
    }

    /// Basic skills are always trainable; others need to be allowed
    /// unless the allowed set is empty.
    pub fn can_use_skill(&self, name: &str) -> bool {
        is_basic_skill(name) || self.allowed_skills.is_empty() || self.allowed_skills.contains(name)
    }

    // =========================================================================
    // Kind helpers
    // =========================================================================

    pub fn is_player(&self) -> bool {
        matches!(self.kind, LivingKind::Player(_))
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.kind {
            LivingKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            LivingKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn monster_data(&self) -> Option<&MonsterData> {
        match &self.kind {
            LivingKind::Monster(data) => Some(data),
            _ => None,
        }
    }

    pub fn in_combat(&self) -> bool {
        self.combat_state == CombatState::Engaged
    }

    /// Capitalized short description for the start of a sentence
    pub fn display_name(&self) -> String {
        capitalize(&self.short)
    }

    /// Nothing left to regenerate, decay or fight
    pub fn is_idle(&self) -> bool {
        self.hp == self.max_hp
            && self.mana == self.max_mana
            && self.intoxication == 0
            && self.combat_state == CombatState::Idle
    }
}
