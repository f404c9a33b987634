//! Wielding weapons and wearing armor.
//!
//! Equipped items stay in the owner's inventory; `wielded` and `worn` only
//! point into it. These operations are silent; callers report the outcome.

use log::debug;

use mud_shared::{ArmorStats, ItemKind, WeaponStats};

use crate::entities::{EntityId, ItemId};
use crate::error::{EngineError, EngineResult};
use crate::world::GameWorld;

impl GameWorld {
    // =========================================================================
    // Queries
    // =========================================================================

    pub fn wielded_weapon(&self, id: EntityId) -> Option<&WeaponStats> {
        let item_id = self.livings.get(&id)?.wielded?;
        match &self.items.get(&item_id)?.kind {
            ItemKind::Weapon(stats) => Some(stats),
            _ => None,
        }
    }

    fn worn_armor(&self, id: EntityId) -> impl Iterator<Item = &ArmorStats> + '_ {
        self.livings
            .get(&id)
            .into_iter()
            .flat_map(|living| living.worn.values())
            .filter_map(move |item_id| match &self.items.get(item_id)?.kind {
                ItemKind::Armor(stats) => Some(stats),
                _ => None,
            })
    }

    /// Sum of worn armor classes
    pub fn total_armor(&self, id: EntityId) -> u32 {
        self.worn_armor(id).map(|a| a.armor_class).sum()
    }

    /// Percent chance worn armor makes a spell fizzle, capped at 100
    pub fn total_spell_failure(&self, id: EntityId) -> u32 {
        self.worn_armor(id)
            .map(|a| a.weight.spell_failure())
            .sum::<u32>()
            .min(100)
    }

    /// Percent penalty to dodge from worn armor, capped at 100
    pub fn total_dodge_penalty(&self, id: EntityId) -> u32 {
        self.worn_armor(id)
            .map(|a| a.weight.dodge_penalty())
            .sum::<u32>()
            .min(100)
    }

    pub(crate) fn carried_item_kind(&self, id: EntityId, item_id: ItemId) -> EngineResult<&ItemKind> {
        let living = self.livings.get(&id).ok_or(EngineError::UnknownEntity(id))?;
        if !living.inventory.contains(&item_id) {
            return Err(EngineError::NotCarried);
        }
        self.items
            .get(&item_id)
            .map(|item| &item.kind)
            .ok_or(EngineError::UnknownItem(item_id))
    }

    pub(crate) fn item_name(&self, item_id: ItemId) -> String {
        self.items
            .get(&item_id)
            .map(|item| item.name.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Weapons
    // =========================================================================

    /// Wield a carried weapon, putting away whatever was wielded before
    pub fn wield(&mut self, id: EntityId, item_id: ItemId) -> EngineResult<()> {
        if !matches!(self.carried_item_kind(id, item_id)?, ItemKind::Weapon(_)) {
            return Err(EngineError::NotAWeapon);
        }
        let previous = self.livings.get(&id).and_then(|l| l.wielded);
        if previous == Some(item_id) {
            return Ok(());
        }
        if previous.is_some() {
            self.unwield(id)?;
        }

        if let Some(living) = self.livings.get_mut(&id) {
            living.wielded = Some(item_id);
        }
        debug!("{} wields {}", id, self.item_name(item_id));
        Ok(())
    }

    pub fn unwield(&mut self, id: EntityId) -> EngineResult<ItemId> {
        let living = self.livings.get_mut(&id).ok_or(EngineError::UnknownEntity(id))?;
        living.wielded.take().ok_or(EngineError::NothingWielded)
    }

    // =========================================================================
    // Armor
    // =========================================================================

    /// Wear a carried armor piece. One piece per slot.
    pub fn wear(&mut self, id: EntityId, item_id: ItemId) -> EngineResult<()> {
        let slot = match self.carried_item_kind(id, item_id)? {
            ItemKind::Armor(stats) => stats.slot.clone(),
            _ => return Err(EngineError::NotArmor),
        };
        let living = self.livings.get_mut(&id).ok_or(EngineError::UnknownEntity(id))?;
        match living.worn.get(&slot) {
            Some(worn) if *worn == item_id => return Ok(()),
            Some(_) => return Err(EngineError::SlotOccupied(slot)),
            None => {}
        }
        living.worn.insert(slot.clone(), item_id);
        debug!("{} wears {} on {}", id, self.item_name(item_id), slot);
        Ok(())
    }

    /// Take off whatever is worn in `slot`
    pub fn remove_armor(&mut self, id: EntityId, slot: &str) -> EngineResult<ItemId> {
        let living = self.livings.get_mut(&id).ok_or(EngineError::UnknownEntity(id))?;
        living
            .worn
            .remove(slot)
            .ok_or_else(|| EngineError::SlotEmpty(slot.to_string()))
    }

    /// Slot an item is worn in, if any
    pub fn worn_slot(&self, id: EntityId, item_id: ItemId) -> Option<String> {
        self.livings
            .get(&id)?
            .worn
            .iter()
            .find(|(_, worn)| **worn == item_id)
            .map(|(slot, _)| slot.clone())
    }

    /// Forget every equipped item without messages. Returns what was equipped.
    pub(crate) fn strip_equipment(&mut self, id: EntityId) -> Vec<ItemId> {
        let Some(living) = self.livings.get_mut(&id) else {
            return Vec::new();
        };
        let mut stripped: Vec<ItemId> = living.wielded.take().into_iter().collect();
        stripped.extend(std::mem::take(&mut living.worn).into_values());
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::{spawn_generic, test_world};

    #[test]
    fn test_wield_requires_carried_weapon() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        let sword = world.give_item(b, 5).unwrap();
        let ale = world.give_item(a, 1).unwrap();

        assert_eq!(world.wield(a, sword), Err(EngineError::NotCarried));
        assert_eq!(world.wield(a, ale), Err(EngineError::NotAWeapon));
        assert_eq!(world.wield(999, sword), Err(EngineError::UnknownEntity(999)));
        assert!(world.wielded_weapon(a).is_none());
    }

    #[test]
    fn test_wield_replaces_previous_weapon() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let dagger = world.give_item(a, 6).unwrap();
        let sword = world.give_item(a, 5).unwrap();

        world.wield(a, dagger).unwrap();
        assert_eq!(world.weapon_skill_name(a), "dagger");
        world.wield(a, sword).unwrap();
        assert_eq!(world.living(a).unwrap().wielded, Some(sword));
        assert_eq!(world.wielded_weapon(a).unwrap().damage, 10);

        assert_eq!(world.unwield(a), Ok(sword));
        assert_eq!(world.unwield(a), Err(EngineError::NothingWielded));
        assert_eq!(world.weapon_skill_name(a), "unarmed");
        // Still carried
        assert_eq!(world.living(a).unwrap().inventory.len(), 2);
    }

    #[test]
    fn test_one_armor_per_slot() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let leather = world.give_item(a, 20).unwrap();
        let mail = world.give_item(a, 22).unwrap();
        let helm = world.give_item(a, 21).unwrap();
        let sword = world.give_item(a, 5).unwrap();

        world.wear(a, leather).unwrap();
        assert_eq!(world.wear(a, mail), Err(EngineError::SlotOccupied("torso".into())));
        assert_eq!(world.wear(a, sword), Err(EngineError::NotArmor));
        world.wear(a, helm).unwrap();
        assert_eq!(world.total_armor(a), 4);
        assert_eq!(world.worn_slot(a, helm).as_deref(), Some("head"));

        assert_eq!(world.remove_armor(a, "torso"), Ok(leather));
        assert_eq!(world.remove_armor(a, "torso"), Err(EngineError::SlotEmpty("torso".into())));
        world.wear(a, mail).unwrap();
        assert_eq!(world.total_armor(a), 7);
    }

    #[test]
    fn test_armor_weight_penalties() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        assert_eq!(world.total_spell_failure(a), 0);
        assert_eq!(world.total_dodge_penalty(a), 0);

        let mail = world.give_item(a, 22).unwrap();
        let helm = world.give_item(a, 21).unwrap();
        let cloak = world.give_item(a, 23).unwrap();
        for item in [mail, helm, cloak] {
            world.wear(a, item).unwrap();
        }
        // 60 + 30 + 10 and 25 + 10 + 0
        assert_eq!(world.total_spell_failure(a), 100);
        assert_eq!(world.total_dodge_penalty(a), 35);
    }

    #[test]
    fn test_strip_equipment() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let sword = world.give_item(a, 5).unwrap();
        let helm = world.give_item(a, 21).unwrap();
        world.wield(a, sword).unwrap();
        world.wear(a, helm).unwrap();

        let mut stripped = world.strip_equipment(a);
        stripped.sort_unstable();
        assert_eq!(stripped, vec![sword, helm]);
        assert_eq!(world.total_armor(a), 0);
        assert!(world.wielded_weapon(a).is_none());
    }
}
