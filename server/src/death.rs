//! Death handling, corpses and the player's way back.
//!
//! `die` dispatches on the living's kind. Every kind stops fighting and
//! announces the death; monsters leave a corpse and are removed, players
//! leave their belongings in a corpse and wake up in the netherworld.

use log::{info, warn};

use mud_shared::{GameEvent, ItemKind};

use crate::entities::{capitalize, Corpse, EntityId, ItemId, ItemLocation, LivingKind, RoomId};
use crate::error::{EngineError, EngineResult};
use crate::world::GameWorld;

impl GameWorld {
    /// Run death for `id`. Fires at most once per death.
    pub fn die(&mut self, id: EntityId, killer: Option<EntityId>) {
        let (name, display, room, kind) = match self.livings.get_mut(&id) {
            Some(living) if !living.dead => {
                living.dead = true;
                (living.name.clone(), living.display_name(), living.room, living.kind.clone())
            }
            _ => return,
        };

        self.stop_combat(id);
        if let Some(room) = room {
            self.tell_room(room, format!("{} has died!", display), &[id]);
        }
        self.emit(GameEvent::EntityDeath {
            entity_id: id,
            killer_id: killer,
        });
        info!("{} ({}) died, killer {:?}", name, id, killer);

        match kind {
            LivingKind::Generic => {
                self.scheduler.deschedule(id);
            }
            LivingKind::Monster(data) => {
                if let Some(killer) = killer {
                    self.award_xp(killer, data.xp_value);
                }

                // Each drop rolls independently and lands on the body first
                let mut contents = self.livings.get(&id).map(|l| l.inventory.clone()).unwrap_or_default();
                for def_id in &data.drops {
                    if self.dice.roll(100) < data.drop_chance {
                        contents.extend(self.clone_item(*def_id, ItemLocation::Carried(id)));
                    }
                }
                if let Some(room) = room {
                    self.spawn_corpse(&name, room, contents);
                } else {
                    for item_id in contents {
                        self.destroy_item(item_id);
                    }
                }

                self.livings.remove(&id);
                self.scheduler.deschedule(id);
            }
            LivingKind::Player(_) => self.player_died(id, room),
        }
    }

    fn award_xp(&mut self, killer: EntityId, amount: u64) {
        let Some(data) = self.livings.get_mut(&killer).and_then(|l| l.player_data_mut()) else {
            return;
        };
        data.add_xp(amount);
        self.tell(killer, format!("You gain {} experience.", amount));
    }

    fn player_died(&mut self, id: EntityId, room: Option<RoomId>) {
        let equipped = self.strip_equipment(id);
        let netherworld = self.config.netherworld_room;

        let contents = match self.livings.get_mut(&id) {
            Some(living) => {
                if let Some(data) = living.player_data_mut() {
                    data.reclaimable = equipped;
                }
                std::mem::take(&mut living.inventory)
            }
            None => return,
        };
        let name = self.livings.get(&id).map(|l| l.name.clone()).unwrap_or_default();
        self.spawn_corpse(&name, room.unwrap_or(self.config.respawn_room), contents);

        if let Some(living) = self.livings.get_mut(&id) {
            living.room = Some(netherworld);
            living.set_hp(living.max_hp());
            living.dead = false;
        }
        self.tell(id, "You have died. Your spirit drifts into the netherworld.");
        self.stop_if_idle(id);

        if !self.save_player(id) {
            warn!("Player {} died but could not be saved", id);
        }
    }

    fn spawn_corpse(&mut self, name: &str, room: RoomId, contents: Vec<ItemId>) -> EntityId {
        let id = self.allocate_entity_id();
        for item_id in &contents {
            self.relocate_item(*item_id, ItemLocation::InCorpse(id));
        }
        let decay_at = self.now() + self.config.corpse_decay_ticks;
        let corpse = Corpse {
            id,
            name: name.to_string(),
            room,
            contents,
            decay_at,
        };
        self.scheduler.schedule_at(id, decay_at);
        self.emit(GameEvent::CorpseSpawn {
            corpse_id: id,
            room,
            name: corpse.short(),
        });
        self.corpses.insert(id, corpse);
        id
    }

    // =========================================================================
    // Corpses
    // =========================================================================

    /// Scheduled corpse handler: decay once the deadline passes
    pub(crate) fn corpse_tick(&mut self, id: EntityId) {
        let Some(decay_at) = self.corpses.get(&id).map(|c| c.decay_at) else {
            self.scheduler.deschedule(id);
            return;
        };
        if self.now() < decay_at {
            self.scheduler.schedule_at(id, decay_at);
            return;
        }

        let Some(corpse) = self.remove_corpse(id) else {
            return;
        };
        for item_id in &corpse.contents {
            self.relocate_item(*item_id, ItemLocation::Room(corpse.room));
        }
        let short = corpse.short();
        let text = match corpse.contents.is_empty() {
            true => format!("{} rots away.", capitalize(&short)),
            false => format!("{} rots away, leaving its belongings behind.", capitalize(&short)),
        };
        self.tell_room(corpse.room, text, &[]);
    }

    fn remove_corpse(&mut self, id: EntityId) -> Option<Corpse> {
        let corpse = self.corpses.remove(&id)?;
        self.scheduler.deschedule(id);
        self.emit(GameEvent::CorpseDespawn { corpse_id: id });
        Some(corpse)
    }

    /// Find a corpse in a room by keyword
    pub fn find_corpse_in_room(&self, room: RoomId, word: &str) -> Option<EntityId> {
        self.corpses_in_room(room)
            .into_iter()
            .find(|id| self.corpses.get(id).map_or(false, |c| c.matches(word)))
    }

    fn corpse_beside(&self, actor: EntityId, corpse: EntityId) -> EngineResult<RoomId> {
        let living = self.livings.get(&actor).ok_or(EngineError::UnknownEntity(actor))?;
        let corpse = self.corpses.get(&corpse).ok_or(EngineError::InvalidTarget)?;
        if living.room != Some(corpse.room) {
            return Err(EngineError::InvalidTarget);
        }
        Ok(corpse.room)
    }

    /// Bury a corpse in the actor's room, destroying what it holds
    pub fn bury_corpse(&mut self, actor: EntityId, corpse: EntityId) -> EngineResult<()> {
        let room = self.corpse_beside(actor, corpse)?;
        let Some(corpse) = self.remove_corpse(corpse) else {
            return Err(EngineError::InvalidTarget);
        };
        for item_id in &corpse.contents {
            self.destroy_item(*item_id);
        }

        let display = self.livings.get(&actor).map(|l| l.display_name()).unwrap_or_default();
        self.tell(actor, format!("You bury {}.", corpse.short()));
        self.tell_room(room, format!("{} buries {}.", display, corpse.short()), &[actor]);
        Ok(())
    }

    // =========================================================================
    // Return from death
    // =========================================================================

    /// Bring a player back from the netherworld to the respawn room
    pub fn resurrect(&mut self, id: EntityId) -> EngineResult<()> {
        let living = self.livings.get(&id).ok_or(EngineError::UnknownEntity(id))?;
        if !living.is_player() || living.room != Some(self.config.netherworld_room) {
            return Err(EngineError::InvalidTarget);
        }
        let display = living.display_name();
        let respawn = self.config.respawn_room;

        self.tell(id, "You feel yourself drawn back into the world of the living.");
        self.move_living(id, respawn);
        self.tell_room(respawn, format!("{} materializes out of thin air.", display), &[id]);
        info!("Player {} resurrected into room {}", id, respawn);
        Ok(())
    }

    /// Take back everything from a co-located corpse, re-equipping what
    /// was worn or wielded at death. Returns the items taken.
    pub fn reclaim_corpse(&mut self, id: EntityId, corpse: EntityId) -> EngineResult<Vec<ItemId>> {
        if !self.livings.get(&id).map_or(false, |l| l.is_player()) {
            return Err(EngineError::InvalidTarget);
        }
        self.corpse_beside(id, corpse)?;

        let contents = match self.corpses.get_mut(&corpse) {
            Some(corpse) => std::mem::take(&mut corpse.contents),
            None => return Err(EngineError::InvalidTarget),
        };
        for item_id in &contents {
            self.relocate_item(*item_id, ItemLocation::Carried(id));
        }
        let reclaimable = match self.livings.get_mut(&id) {
            Some(living) => {
                living.inventory.extend(contents.iter().copied());
                living
                    .player_data_mut()
                    .map(|data| std::mem::take(&mut data.reclaimable))
                    .unwrap_or_default()
            }
            None => Vec::new(),
        };

        for item_id in reclaimable.into_iter().filter(|item_id| contents.contains(item_id)) {
            let result = match self.items.get(&item_id).map(|item| item.kind.clone()) {
                Some(ItemKind::Weapon(_)) => self.wield(id, item_id),
                Some(ItemKind::Armor(_)) => self.wear(id, item_id),
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!("Could not re-equip {} for {}: {}", item_id, id, e);
            }
        }

        self.tell(id, "You reclaim your belongings.");
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::world::tests::{spawn_generic, test_world};
    use mud_shared::{find_monster_template, Stat};

    #[test]
    fn test_generic_death_stays_in_world() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        world.start_combat(a, b);

        world.die(b, Some(a));
        world.die(b, Some(a));

        let events = world.drain_events();
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityDeath { entity_id, killer_id: Some(k) } if *entity_id == b && *k == a))
            .count();
        assert_eq!(deaths, 1);
        assert!(world.living(b).unwrap().dead);
        assert!(!world.is_alive(b));
        assert!(!world.is_scheduled(b));
        assert!(world.corpses_in_room(1).is_empty());
    }

    #[test]
    fn test_dead_generic_is_never_rescheduled() {
        let mut world = test_world();
        let b = spawn_generic(&mut world, "b");
        world.die(b, None);

        world.add_intoxication(b, 30);
        world.set_stat(b, Stat::Con, 5);
        assert!(!world.is_scheduled(b));

        let now = world.now();
        world.scheduler.ensure_active(b, now);
        world.pulse();
        assert!(!world.is_scheduled(b));
    }

    #[test]
    fn test_monster_death_leaves_corpse_with_loot() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 4);
        let goblin = world.spawn_monster(&find_monster_template("goblin").unwrap(), 4);
        let carried = world.give_item(goblin, 10).unwrap();

        world.dice.push_rolls(&[39]);
        world.die(goblin, Some(hero));

        assert!(world.living(goblin).is_none());
        assert!(!world.is_scheduled(goblin));
        assert_eq!(world.living(hero).unwrap().player_data().unwrap().xp, 15);

        let corpse_id = world.corpses_in_room(4)[0];
        let corpse = world.corpse(corpse_id).unwrap();
        assert_eq!(corpse.contents.len(), 2);
        assert_eq!(corpse.contents[0], carried);
        let blade = world.item(corpse.contents[1]).unwrap();
        assert_eq!(blade.def_id, 3);
        assert_eq!(blade.location, ItemLocation::InCorpse(corpse_id));
        assert!(world.is_scheduled(corpse_id));
        assert!(world.drain_events().contains(&GameEvent::CorpseSpawn {
            corpse_id,
            room: 4,
            name: "the corpse of goblin".into(),
        }));
    }

    #[test]
    fn test_monster_killed_by_monster_awards_nothing() {
        let mut world = test_world();
        let wolf = world.spawn_monster(&find_monster_template("wolf").unwrap(), 4);
        let rat = world.spawn_monster(&find_monster_template("rat").unwrap(), 4);

        world.dice.push_rolls(&[99]);
        world.die(rat, Some(wolf));

        let corpse = world.corpse(world.corpses_in_room(4)[0]).unwrap();
        assert!(corpse.contents.is_empty());
        assert!(world.living(wolf).unwrap().player_data().is_none());
    }

    #[test]
    fn test_player_death_moves_belongings_to_corpse() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        let sword = world.give_item(hero, 5).unwrap();
        let helm = world.give_item(hero, 21).unwrap();
        let ale = world.give_item(hero, 1).unwrap();
        world.wield(hero, sword).unwrap();
        world.wear(hero, helm).unwrap();
        world.living_mut(hero).unwrap().set_hp(0);

        world.die(hero, None);

        let living = world.living(hero).unwrap();
        assert_eq!(living.room, Some(0));
        assert_eq!(living.hp(), living.max_hp());
        assert!(!living.dead);
        assert!(living.inventory.is_empty());
        assert!(living.wielded.is_none());
        assert!(living.worn.is_empty());
        let mut reclaimable = living.player_data().unwrap().reclaimable.clone();
        reclaimable.sort_unstable();
        assert_eq!(reclaimable, vec![sword, helm]);

        let corpse = world.corpse(world.corpses_in_room(3)[0]).unwrap();
        assert_eq!(corpse.contents, vec![sword, helm, ale]);
        assert_eq!(corpse.name, "Hero");
    }

    #[test]
    fn test_corpse_decays_into_room() {
        let mut world = GameWorld::new(EngineConfig {
            rng_seed: Some(7),
            corpse_decay_ticks: 3,
            ..EngineConfig::default()
        });
        let hero = world.spawn_player("Hero", 3);
        let ale = world.give_item(hero, 1).unwrap();
        world.die(hero, None);
        let corpse_id = world.corpses_in_room(3)[0];

        world.pulse();
        world.pulse();
        assert!(world.corpse(corpse_id).is_some());
        world.pulse();

        assert!(world.corpse(corpse_id).is_none());
        assert!(!world.is_scheduled(corpse_id));
        assert_eq!(world.items_in_room(3), vec![ale]);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::CorpseDespawn { corpse_id }));
        assert!(events.contains(&GameEvent::room(
            3,
            "The corpse of Hero rots away, leaving its belongings behind.",
            &[]
        )));
    }

    #[test]
    fn test_bury_corpse() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        let digger = spawn_generic(&mut world, "digger");
        let ale = world.give_item(hero, 1).unwrap();
        world.die(hero, None);
        let corpse_id = world.find_corpse_in_room(3, "hero corpse").unwrap();

        assert_eq!(world.bury_corpse(digger, corpse_id), Err(EngineError::InvalidTarget));
        world.move_living(digger, 3);
        assert_eq!(world.bury_corpse(digger, corpse_id), Ok(()));
        assert!(world.corpse(corpse_id).is_none());
        assert!(world.item(ale).is_none());
        assert_eq!(world.bury_corpse(digger, corpse_id), Err(EngineError::InvalidTarget));
    }

    #[test]
    fn test_resurrect_and_reclaim() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        let sword = world.give_item(hero, 5).unwrap();
        let helm = world.give_item(hero, 21).unwrap();
        let ale = world.give_item(hero, 1).unwrap();
        world.wield(hero, sword).unwrap();
        world.wear(hero, helm).unwrap();

        assert_eq!(world.resurrect(hero), Err(EngineError::InvalidTarget));
        world.die(hero, None);
        let corpse_id = world.corpses_in_room(3)[0];
        assert_eq!(world.reclaim_corpse(hero, corpse_id), Err(EngineError::InvalidTarget));

        assert_eq!(world.resurrect(hero), Ok(()));
        assert_eq!(world.living(hero).unwrap().room, Some(1));
        world.move_living(hero, 3);

        let taken = world.reclaim_corpse(hero, corpse_id).unwrap();
        assert_eq!(taken, vec![sword, helm, ale]);
        let living = world.living(hero).unwrap();
        assert_eq!(living.wielded, Some(sword));
        assert_eq!(living.worn.get("head"), Some(&helm));
        assert_eq!(living.inventory.len(), 3);
        assert!(living.player_data().unwrap().reclaimable.is_empty());
        assert_eq!(world.item(ale).unwrap().location, ItemLocation::Carried(hero));
        assert!(world.corpse(corpse_id).unwrap().contents.is_empty());
    }
}
