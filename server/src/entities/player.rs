//! Player-specific extension data.

use mud_shared::BASIC_SKILLS;

use super::ItemId;

/// Player progression and death bookkeeping
#[derive(Debug, Clone, Default)]
pub struct PlayerData {
    pub xp: u64,
    /// Guild keys in join order
    pub guilds: Vec<String>,
    /// Items stripped into a corpse at death, re-equipped when reclaimed
    pub reclaimable: Vec<ItemId>,
}

impl PlayerData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_member(&self, guild: &str) -> bool {
        self.guilds.iter().any(|g| g == guild)
    }

    pub fn add_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
    }
}

/// Skills a fresh player may train before joining any guild
pub fn starting_allowed_skills() -> impl Iterator<Item = String> {
    BASIC_SKILLS.iter().map(|s| s.to_string())
}
