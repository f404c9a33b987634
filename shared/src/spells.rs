//! Spell definitions shared between client and server.

use serde::{Deserialize, Serialize};

// =============================================================================
// Spell Types
// =============================================================================

/// What a spell does once it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellEffect {
    /// Damage a target. Deals `power / 4 * 2` plus `random(power / 2)` if `variable`.
    Bolt { variable: bool },
    /// Heal a target (self if none given) by `power / 2 + random(power / 2)`
    Heal,
    /// Ward the caster for `power / 4 + random(power / 4)` (minimum 2), applied as vigor
    Ward,
}

/// Spell definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellDef {
    /// Unique spell ID
    pub id: u32,
    /// Display name
    pub name: String,
    /// Magic school skill that powers and trains with the spell
    pub school: String,
    /// Mana required to cast
    pub mana_cost: u32,
    /// School skill required to cast
    pub min_skill: u32,
    /// School skill required to learn
    pub learn_skill: u32,
    pub effect: SpellEffect,
    pub description: String,
}

// =============================================================================
// Spell Definitions
// =============================================================================

/// Get all spell definitions
pub fn get_spell_definitions() -> Vec<SpellDef> {
    vec![
        // =====================================================================
        // Evocation (ID 1-10)
        // =====================================================================
        SpellDef {
            id: 1,
            name: "magic missile".into(),
            school: "evocation".into(),
            mana_cost: 5,
            min_skill: 0,
            learn_skill: 0,
            effect: SpellEffect::Bolt { variable: false },
            description: "Launches a bolt of magical force that never misses.".into(),
        },
        SpellDef {
            id: 2,
            name: "fireball".into(),
            school: "evocation".into(),
            mana_cost: 15,
            min_skill: 10,
            learn_skill: 10,
            effect: SpellEffect::Bolt { variable: true },
            description: "Hurls a roaring ball of flame.".into(),
        },
        // =====================================================================
        // Abjuration (ID 11-20)
        // =====================================================================
        SpellDef {
            id: 11,
            name: "heal".into(),
            school: "abjuration".into(),
            mana_cost: 10,
            min_skill: 0,
            learn_skill: 0,
            effect: SpellEffect::Heal,
            description: "Channels healing energy to restore health.".into(),
        },
        SpellDef {
            id: 12,
            name: "shield".into(),
            school: "abjuration".into(),
            mana_cost: 8,
            min_skill: 5,
            learn_skill: 5,
            effect: SpellEffect::Ward,
            description: "Creates a magical shield that absorbs some damage.".into(),
        },
    ]
}

/// Get spell by ID
pub fn get_spell_by_id(id: u32) -> Option<SpellDef> {
    get_spell_definitions().into_iter().find(|s| s.id == id)
}
