//! Monster-specific extension data.

use mud_shared::MonsterTemplate;

/// Rewards and behaviour of an autonomous actor
#[derive(Debug, Clone)]
pub struct MonsterData {
    pub xp_value: u64,
    /// Attacks players entering its room
    pub aggressive: bool,
    /// Independent per-item drop chance in percent
    pub drop_chance: u32,
    /// Item template ids rolled on death
    pub drops: Vec<u32>,
}

impl From<&MonsterTemplate> for MonsterData {
    fn from(template: &MonsterTemplate) -> Self {
        Self {
            xp_value: template.xp_value,
            aggressive: template.aggressive,
            drop_chance: template.drop_chance.min(100),
            drops: template.drops.clone(),
        }
    }
}
