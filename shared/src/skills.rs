//! Skill names and the skill → stat training table.

use serde::{Deserialize, Serialize};
use crate::Stat;

/// Skills every living may train regardless of its allowed set
pub const BASIC_SKILLS: [&str; 4] = ["unarmed", "dodge", "haggling", "swimming"];

/// Skill used when fighting without a weapon
pub const UNARMED: &str = "unarmed";

/// Skill used to avoid incoming attacks
pub const DODGE: &str = "dodge";

/// Broad family a skill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Combat,
    Finesse,
    Magic,
    Social,
    Endurance,
    Dodge,
}

impl SkillCategory {
    /// Stats that may improve alongside a skill of this category
    pub fn trained_stats(&self) -> &'static [Stat] {
        match self {
            Self::Combat => &[Stat::Str, Stat::Dex],
            Self::Finesse => &[Stat::Dex, Stat::Agi],
            Self::Magic => &[Stat::Int, Stat::Wis],
            Self::Social => &[Stat::Cha],
            Self::Endurance => &[Stat::Con, Stat::Str],
            Self::Dodge => &[Stat::Agi],
        }
    }
}

/// Look up which category a skill belongs to
pub fn skill_category(skill: &str) -> Option<SkillCategory> {
    let category = match skill {
        "unarmed" | "sword" | "axe" | "mace" | "club" | "polearm" | "shield_block" => SkillCategory::Combat,
        "dagger" | "parry" | "archery" | "stealth" => SkillCategory::Finesse,
        "evocation" | "conjuration" | "transmutation" | "abjuration" | "divination" => SkillCategory::Magic,
        "haggling" | "persuasion" => SkillCategory::Social,
        "swimming" | "climbing" => SkillCategory::Endurance,
        "dodge" => SkillCategory::Dodge,
        _ => return None,
    };
    Some(category)
}

pub fn is_basic_skill(skill: &str) -> bool {
    BASIC_SKILLS.contains(&skill)
}
