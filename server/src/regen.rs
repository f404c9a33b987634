//! Per-tick HP and mana regeneration, intoxication and drinking.

use log::debug;

use mud_shared::{ItemKind, Stat};

use crate::combat::INTOXICATION_DECAY;
use crate::entities::{EntityId, ItemId};
use crate::error::{EngineError, EngineResult};
use crate::world::GameWorld;

impl GameWorld {
    // =========================================================================
    // Resource queries
    // =========================================================================

    pub fn query_hp(&self, id: EntityId) -> Option<u32> {
        self.livings.get(&id).map(|l| l.hp())
    }

    pub fn query_max_hp(&self, id: EntityId) -> Option<u32> {
        self.livings.get(&id).map(|l| l.max_hp())
    }

    pub fn query_mana(&self, id: EntityId) -> Option<u32> {
        self.livings.get(&id).map(|l| l.mana())
    }

    pub fn query_max_mana(&self, id: EntityId) -> Option<u32> {
        self.livings.get(&id).map(|l| l.max_mana())
    }

    pub fn query_intoxication(&self, id: EntityId) -> u32 {
        self.livings.get(&id).map_or(0, |l| l.intoxication())
    }

    /// Adjust intoxication, clamped to `0..=100`. Any remaining
    /// intoxication keeps the living scheduled so it can wear off.
    pub fn add_intoxication(&mut self, id: EntityId, amount: i32) -> u32 {
        let Some(living) = self.livings.get_mut(&id) else {
            return 0;
        };
        let level = living.adjust_intoxication(amount);
        if level > 0 {
            self.ensure_active(id);
        }
        level
    }

    // =========================================================================
    // Regeneration
    // =========================================================================

    /// Idle heartbeat: sober up, regenerate, and deschedule once nothing is left
    pub(crate) fn regulate_resources(&mut self, id: EntityId) {
        let Some(living) = self.livings.get_mut(&id) else {
            return;
        };

        let was_drunk = living.intoxication() > 0;
        let intoxication = living.adjust_intoxication(-INTOXICATION_DECAY);
        let sobered = was_drunk && intoxication == 0;

        let mut hp_full = false;
        let mut mana_full = false;
        if !living.in_combat() {
            if living.hp() < living.max_hp() {
                living.heal(living.regen_rate.saturating_add(intoxication / 10));
                hp_full = living.hp() == living.max_hp();
            }
            if living.mana() < living.max_mana() {
                living.restore_mana(1 + living.stat(Stat::Wis) / 3);
                mana_full = living.mana() == living.max_mana();
            }
        }
        let engaged = living.in_combat();

        if sobered {
            self.tell(id, "You feel sober again.");
        }
        if hp_full {
            self.tell(id, "You feel fully healed.");
        }
        if mana_full {
            self.tell(id, "Your magical energy is fully restored.");
        }
        if !engaged {
            self.stop_if_idle(id);
        }
    }

    // =========================================================================
    // Drinking
    // =========================================================================

    /// Drink a carried item. Returns the new intoxication level.
    pub fn drink(&mut self, id: EntityId, item_id: ItemId) -> EngineResult<u32> {
        let (intoxication, heal) = match self.carried_item_kind(id, item_id)? {
            ItemKind::Drink { intoxication, heal } => (*intoxication, *heal),
            _ => return Err(EngineError::NotDrinkable),
        };
        let name = self.item_name(item_id);

        let (display, room) = match self.livings.get_mut(&id) {
            Some(living) => {
                living.inventory.retain(|held| *held != item_id);
                living.heal(heal);
                (living.display_name(), living.room)
            }
            None => return Err(EngineError::UnknownEntity(id)),
        };
        self.destroy_item(item_id);

        self.tell(id, format!("You drink the {}.", name));
        if let Some(room) = room {
            self.tell_room(room, format!("{} drinks a {}.", display, name), &[id]);
        }

        let level = self.add_intoxication(id, intoxication.min(i32::MAX as u32) as i32);
        // Healing may leave nothing to do when the drink was not alcoholic
        self.ensure_active(id);
        self.stop_if_idle(id);
        debug!("{} drank {}, intoxication now {}", id, name, level);
        Ok(level)
    }
}
