//! Item definitions shared between client and server.

use serde::{Deserialize, Serialize};

/// Item template. Instances are cloned from these by the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}

/// What an item can be used for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponStats),
    Armor(ArmorStats),
    Drink { intoxication: u32, heal: u32 },
    Misc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: u32,
    /// Skill trained and used when fighting with this weapon
    pub skill_type: String,
    /// blade, blunt, piercing
    pub weapon_kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorStats {
    pub armor_class: u32,
    pub slot: String,
    pub weight: WeightCategory,
}

/// Armor weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightCategory {
    None,
    Light,
    Medium,
    Heavy,
}

impl WeightCategory {
    /// Percent chance this piece makes a spell fizzle
    pub fn spell_failure(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Light => 10,
            Self::Medium => 30,
            Self::Heavy => 60,
        }
    }

    /// Percent reduction applied to the wearer's dodge skill
    pub fn dodge_penalty(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Light => 0,
            Self::Medium => 10,
            Self::Heavy => 25,
        }
    }
}

impl ItemDef {
    pub fn weapon(&self) -> Option<&WeaponStats> {
        match &self.kind {
            ItemKind::Weapon(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn armor(&self) -> Option<&ArmorStats> {
        match &self.kind {
            ItemKind::Armor(stats) => Some(stats),
            _ => None,
        }
    }
}

fn weapon(id: u32, name: &str, description: &str, damage: u32, skill_type: &str, weapon_kind: &str) -> ItemDef {
    ItemDef {
        id,
        name: name.into(),
        description: description.into(),
        kind: ItemKind::Weapon(WeaponStats {
            damage,
            skill_type: skill_type.into(),
            weapon_kind: weapon_kind.into(),
        }),
    }
}

fn armor(id: u32, name: &str, description: &str, armor_class: u32, slot: &str, weight: WeightCategory) -> ItemDef {
    ItemDef {
        id,
        name: name.into(),
        description: description.into(),
        kind: ItemKind::Armor(ArmorStats {
            armor_class,
            slot: slot.into(),
            weight,
        }),
    }
}

/// Built-in item definitions
pub fn get_item_definitions() -> Vec<ItemDef> {
    vec![
        // Drinks (ID 1-2)
        ItemDef {
            id: 1,
            name: "mug of ale".into(),
            description: "A frothy mug of tavern ale.".into(),
            kind: ItemKind::Drink { intoxication: 15, heal: 2 },
        },
        ItemDef {
            id: 2,
            name: "dwarven spirits".into(),
            description: "A small flask of something that burns.".into(),
            kind: ItemKind::Drink { intoxication: 40, heal: 0 },
        },
        // Weapons (ID 3-9)
        weapon(3, "goblin blade", "A crude, notched short sword.", 6, "sword", "blade"),
        weapon(4, "troll club", "A knotted club the size of a small tree.", 12, "club", "blunt"),
        weapon(5, "iron sword", "A sturdy iron blade.", 10, "sword", "blade"),
        weapon(6, "rusty dagger", "A worn dagger. Better than nothing.", 4, "dagger", "piercing"),
        // Trophies (ID 10-19)
        ItemDef {
            id: 10,
            name: "rat tooth".into(),
            description: "A yellowed incisor.".into(),
            kind: ItemKind::Misc,
        },
        ItemDef {
            id: 11,
            name: "wolf fang".into(),
            description: "A long curved fang.".into(),
            kind: ItemKind::Misc,
        },
        // Armor (ID 20-29)
        armor(20, "leather armor", "Supple boiled leather.", 2, "torso", WeightCategory::Light),
        armor(21, "iron helm", "A dented iron helmet.", 2, "head", WeightCategory::Medium),
        armor(22, "chainmail", "Heavy interlocking rings of steel.", 5, "torso", WeightCategory::Heavy),
        armor(23, "wolf pelt", "A rough pelt worn as a cloak.", 1, "cloak", WeightCategory::Light),
        armor(24, "troll hide", "A thick, foul-smelling hide.", 4, "torso", WeightCategory::Medium),
        armor(25, "spider silk gloves", "Gloves woven from fine silk.", 1, "hands", WeightCategory::None),
    ]
}
