//! Corpses left behind when a living dies.

use super::{EntityId, ItemId, RoomId};

/// A separately scheduled entity holding the deceased's belongings
#[derive(Debug, Clone)]
pub struct Corpse {
    pub id: EntityId,
    /// Name of the deceased
    pub name: String,
    pub room: RoomId,
    pub contents: Vec<ItemId>,
    /// Tick at which the corpse decays
    pub decay_at: u64,
}

impl Corpse {
    pub fn short(&self) -> String {
        format!("the corpse of {}", self.name)
    }

    /// Matches "corpse", "body", "<name> corpse" and "corpse of <name>"
    pub fn matches(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        let name = self.name.to_lowercase();
        word == "corpse"
            || word == "body"
            || word == format!("{} corpse", name)
            || word == format!("corpse of {}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpse_ids() {
        let corpse = Corpse {
            id: 1,
            name: "Goblin".into(),
            room: 3,
            contents: Vec::new(),
            decay_at: 10,
        };
        assert!(corpse.matches("corpse"));
        assert!(corpse.matches("goblin corpse"));
        assert!(corpse.matches("Corpse of goblin"));
        assert!(!corpse.matches("wolf corpse"));
        assert_eq!(corpse.short(), "the corpse of Goblin");
    }
}
