//! Game world management.
//!
//! The world is an arena of livings, corpses and item instances keyed by id.
//! Cross-entity references (attackers, killers, corpse contents) are ids and
//! are re-resolved on every use; a missing id means the entity is gone.

use std::collections::HashMap;

use log::{debug, info, warn};

use mud_shared::{
    get_item_definitions, GameEvent, ItemDef, MonsterTemplate, PlayerSave, Stat, Stats,
};

use crate::config::EngineConfig;
use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::entities::{
    player, Corpse, EntityId, Item, ItemId, ItemLocation, Living, LivingKind, MonsterData,
    PlayerData, RoomId,
};
use crate::persistence::PersistenceHandle;
use crate::scheduler::TickScheduler;

/// The game world containing all entities
pub struct GameWorld {
    pub(crate) livings: HashMap<EntityId, Living>,
    pub(crate) corpses: HashMap<EntityId, Corpse>,
    pub(crate) items: HashMap<ItemId, Item>,
    next_entity_id: EntityId,
    next_item_id: ItemId,
    /// Item templates used by the clone primitive
    pub item_defs: HashMap<u32, ItemDef>,
    pub(crate) scheduler: TickScheduler,
    pub(crate) dice: Dice,
    pub(crate) config: EngineConfig,
    now: u64,
    events: Vec<GameEvent>,
    persistence: Option<PersistenceHandle>,
}

impl GameWorld {
    pub fn new(config: EngineConfig) -> Self {
        let dice = match config.rng_seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::from_entropy(),
        };
        let item_defs = get_item_definitions()
            .into_iter()
            .map(|def| (def.id, def))
            .collect();

        Self {
            livings: HashMap::new(),
            corpses: HashMap::new(),
            items: HashMap::new(),
            next_entity_id: 1,
            next_item_id: 1,
            item_defs,
            scheduler: TickScheduler::new(config.heartbeat_interval),
            dice,
            config,
            now: 0,
            events: Vec::new(),
            persistence: None,
        }
    }

    pub fn set_persistence(&mut self, persistence: PersistenceHandle) {
        self.persistence = Some(persistence);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current logical tick
    pub fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn allocate_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawn a living with the given stat block
    pub fn spawn_living(&mut self, name: &str, kind: LivingKind, stats: Stats, room: Option<RoomId>) -> EntityId {
        let id = self.allocate_entity_id();
        let mut living = Living::with_stats(id, name, kind, stats);
        living.room = room;
        living.regen_rate = self.config.regen_rate;
        self.livings.insert(id, living);
        id
    }

    /// Spawn a monster from a template
    pub fn spawn_monster(&mut self, template: &MonsterTemplate, room: RoomId) -> EntityId {
        let kind = LivingKind::Monster(MonsterData::from(template));
        let id = self.spawn_living(&template.name, kind, template.stats, Some(room));
        if let Some(monster) = self.livings.get_mut(&id) {
            monster.short = template.short.clone();
        }
        debug!("Spawned {} ({}) in room {}", template.name, id, room);
        id
    }

    /// Spawn a fresh player with default stats
    pub fn spawn_player(&mut self, name: &str, room: RoomId) -> EntityId {
        let id = self.spawn_living(name, LivingKind::Player(PlayerData::new()), Stats::default(), Some(room));
        if let Some(living) = self.livings.get_mut(&id) {
            living.allowed_skills.extend(player::starting_allowed_skills());
        }
        info!("Player '{}' ({}) entered room {}", name, id, room);
        id
    }

    /// Spawn a player from saved state, rebuilding and re-equipping items
    pub fn spawn_player_from_save(&mut self, save: &PlayerSave) -> EntityId {
        let room = save.room.unwrap_or(self.config.respawn_room);
        let data = PlayerData {
            xp: save.xp,
            guilds: save.guilds.clone(),
            reclaimable: Vec::new(),
        };
        let id = self.spawn_living(&save.name, LivingKind::Player(data), save.stats, Some(room));

        let mut carried = Vec::new();
        for def_id in &save.inventory {
            if let Some(item_id) = self.clone_item(*def_id, ItemLocation::Carried(id)) {
                carried.push(item_id);
            }
        }
        let wielded = save
            .wielded
            .and_then(|def_id| self.clone_item(def_id, ItemLocation::Carried(id)));
        let worn: Vec<ItemId> = save
            .worn
            .iter()
            .filter_map(|def_id| self.clone_item(*def_id, ItemLocation::Carried(id)))
            .collect();

        if let Some(living) = self.livings.get_mut(&id) {
            living.set_hp(save.hp);
            living.set_mana(save.mana);
            living.adjust_intoxication(save.intoxication as i32);
            for (skill, value) in &save.skills {
                living.set_skill(skill, *value);
            }
            living.allowed_skills = save.allowed_skills.iter().cloned().collect();
            living.known_spells = save.known_spells.iter().copied().collect();
            living.inventory = carried;
            living.inventory.extend(wielded);
            living.inventory.extend(worn.iter().copied());
        }

        if let Some(weapon) = wielded {
            if let Err(e) = self.wield(id, weapon) {
                warn!("Could not re-wield saved weapon for {}: {}", save.name, e);
            }
        }
        for armor in worn {
            if let Err(e) = self.wear(id, armor) {
                warn!("Could not re-wear saved armor for {}: {}", save.name, e);
            }
        }

        // Anything below full needs regeneration
        self.ensure_active(id);
        self.stop_if_idle(id);

        info!("Player '{}' ({}) restored into room {}", save.name, id, room);
        id
    }

    /// Capture a player's persistent state
    pub fn snapshot_player(&self, id: EntityId) -> Option<PlayerSave> {
        let living = self.livings.get(&id)?;
        let data = living.player_data()?;

        let equipped: Vec<ItemId> = living
            .wielded
            .iter()
            .chain(living.worn.values())
            .copied()
            .collect();
        let template_of = |item_id: &ItemId| self.items.get(item_id).map(|item| item.def_id);

        Some(PlayerSave {
            name: living.name.clone(),
            room: living.room,
            stats: *living.stats(),
            hp: living.hp(),
            mana: living.mana(),
            intoxication: living.intoxication(),
            xp: data.xp,
            guilds: data.guilds.clone(),
            skills: living.skills().iter().map(|(k, v)| (k.clone(), *v)).collect(),
            allowed_skills: living.allowed_skills.iter().cloned().collect(),
            known_spells: living.known_spells.iter().copied().collect(),
            inventory: living
                .inventory
                .iter()
                .filter(|item_id| !equipped.contains(item_id))
                .filter_map(template_of)
                .collect(),
            wielded: living.wielded.as_ref().and_then(template_of),
            worn: living.worn.values().filter_map(template_of).collect(),
        })
    }

    /// Remove a living from the world along with everything it carries
    pub fn despawn(&mut self, id: EntityId) -> Option<Living> {
        let living = self.livings.remove(&id)?;
        for item_id in &living.inventory {
            self.items.remove(item_id);
        }
        self.scheduler.deschedule(id);
        debug!("Despawned {} ({})", living.name, id);
        Some(living)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn living(&self, id: EntityId) -> Option<&Living> {
        self.livings.get(&id)
    }

    pub fn living_mut(&mut self, id: EntityId) -> Option<&mut Living> {
        self.livings.get_mut(&id)
    }

    /// Existence check for weak references
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.livings.get(&id).map_or(false, |l| l.is_alive())
    }

    /// Ids of livings in a room, in id order
    pub fn livings_in_room(&self, room: RoomId) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .livings
            .values()
            .filter(|l| l.room == Some(room))
            .map(|l| l.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn players(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .livings
            .values()
            .filter(|l| l.is_player())
            .map(|l| l.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Find a living in a room by name or short description
    pub fn find_living_in_room(&self, room: RoomId, name: &str) -> Option<EntityId> {
        let name = name.to_lowercase();
        self.livings_in_room(room).into_iter().find(|id| {
            self.livings.get(id).map_or(false, |l| {
                l.name.to_lowercase() == name || l.short.to_lowercase().ends_with(&name)
            })
        })
    }

    pub fn corpse(&self, id: EntityId) -> Option<&Corpse> {
        self.corpses.get(&id)
    }

    pub fn corpses_in_room(&self, room: RoomId) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .corpses
            .values()
            .filter(|c| c.room == room)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items_in_room(&self, room: RoomId) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .items
            .values()
            .filter(|i| i.location == ItemLocation::Room(room))
            .map(|i| i.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Find a carried item by name
    pub fn find_carried_item(&self, owner: EntityId, name: &str) -> Option<ItemId> {
        let name = name.to_lowercase();
        let living = self.livings.get(&owner)?;
        living.inventory.iter().copied().find(|id| {
            self.items.get(id).map_or(false, |item| item.name == name || item.name.ends_with(&name))
        })
    }

    pub fn find_item_in_room(&self, room: RoomId, name: &str) -> Option<ItemId> {
        let name = name.to_lowercase();
        self.items_in_room(room).into_iter().find(|id| {
            self.items.get(id).map_or(false, |item| item.name == name || item.name.ends_with(&name))
        })
    }

    /// Move an item lying in the living's room into its inventory
    pub fn pick_up(&mut self, id: EntityId, item_id: ItemId) -> EngineResult<()> {
        let room = self
            .livings
            .get(&id)
            .ok_or(EngineError::UnknownEntity(id))?
            .room
            .ok_or(EngineError::InvalidTarget)?;
        let item = self.items.get(&item_id).ok_or(EngineError::UnknownItem(item_id))?;
        if item.location != ItemLocation::Room(room) {
            return Err(EngineError::InvalidTarget);
        }

        self.relocate_item(item_id, ItemLocation::Carried(id));
        if let Some(living) = self.livings.get_mut(&id) {
            living.inventory.push(item_id);
        }
        Ok(())
    }

    /// Co-location predicate used to validate attack adjacency
    pub fn co_located(&self, a: EntityId, b: EntityId) -> bool {
        match (self.livings.get(&a), self.livings.get(&b)) {
            (Some(a), Some(b)) => a.room.is_some() && a.room == b.room,
            _ => false,
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Clone an item instance from a template
    pub fn clone_item(&mut self, def_id: u32, location: ItemLocation) -> Option<ItemId> {
        let def = self.item_defs.get(&def_id)?;
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.insert(id, Item::from_def(id, def, location));
        Some(id)
    }

    /// Clone an item straight into a living's inventory
    pub fn give_item(&mut self, to: EntityId, def_id: u32) -> Option<ItemId> {
        if !self.livings.contains_key(&to) {
            return None;
        }
        let item_id = self.clone_item(def_id, ItemLocation::Carried(to))?;
        if let Some(living) = self.livings.get_mut(&to) {
            living.inventory.push(item_id);
        }
        Some(item_id)
    }

    pub(crate) fn destroy_item(&mut self, id: ItemId) {
        self.items.remove(&id);
    }

    pub(crate) fn relocate_item(&mut self, id: ItemId, location: ItemLocation) {
        if let Some(item) = self.items.get_mut(&id) {
            item.location = location;
        }
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Move a living to a room. Aggressive monsters already there attack
    /// an arriving player.
    pub fn move_living(&mut self, id: EntityId, room: RoomId) {
        let is_player = match self.livings.get_mut(&id) {
            Some(living) => {
                living.room = Some(room);
                living.is_player()
            }
            None => return,
        };

        if !is_player || !self.is_alive(id) {
            return;
        }

        let aggressors: Vec<EntityId> = self
            .livings_in_room(room)
            .into_iter()
            .filter(|other| *other != id)
            .filter(|other| {
                self.livings.get(other).map_or(false, |l| {
                    l.is_alive() && !l.in_combat() && l.monster_data().map_or(false, |m| m.aggressive)
                })
            })
            .collect();

        for monster_id in aggressors {
            let (monster_name, player_name) = match (self.livings.get(&monster_id), self.livings.get(&id)) {
                (Some(m), Some(p)) => (m.display_name(), p.name.clone()),
                _ => continue,
            };
            self.tell(id, format!("{} attacks you!", monster_name));
            self.tell_room(room, format!("{} attacks {}!", monster_name, player_name), &[id, monster_id]);
            self.start_combat(monster_id, id);
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn tell(&mut self, to: EntityId, text: impl Into<String>) {
        self.events.push(GameEvent::message(to, text));
    }

    pub fn tell_room(&mut self, room: RoomId, text: impl Into<String>, exclude: &[EntityId]) {
        self.events.push(GameEvent::room(room, text, exclude));
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Make sure a living receives heartbeats while it has work
    pub fn ensure_active(&mut self, id: EntityId) {
        let alive = self.livings.get(&id).map_or(false, |l| !l.dead);
        if alive && self.scheduler.ensure_active(id, self.now) {
            debug!("Scheduled {} at tick {}", id, self.now);
        }
    }

    /// Deschedule a living once it has nothing left to do
    pub fn stop_if_idle(&mut self, id: EntityId) -> bool {
        let idle = self.livings.get(&id).map_or(true, |l| l.is_idle());
        if idle && self.scheduler.deschedule(id) {
            debug!("Descheduled idle {} at tick {}", id, self.now);
        }
        idle
    }

    pub fn is_scheduled(&self, id: EntityId) -> bool {
        self.scheduler.is_active(id)
    }

    /// Advance one logical tick and run every due handler to completion
    pub fn pulse(&mut self) {
        self.now += 1;
        for id in self.scheduler.pop_due(self.now) {
            if self.livings.contains_key(&id) {
                self.heart_beat(id);
            } else if self.corpses.contains_key(&id) {
                self.corpse_tick(id);
            } else {
                // Destroyed since it was scheduled
                self.scheduler.deschedule(id);
            }
        }
    }

    /// One heartbeat: fight if engaged, otherwise regenerate
    pub fn heart_beat(&mut self, id: EntityId) {
        let engaged = match self.livings.get(&id) {
            Some(living) if !living.dead => living.in_combat(),
            _ => {
                self.scheduler.deschedule(id);
                return;
            }
        };
        if engaged {
            self.do_attack(id);
        } else {
            self.regulate_resources(id);
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Queue a save of a player's state. Never blocks.
    pub fn save_player(&mut self, id: EntityId) -> bool {
        let Some(save) = self.snapshot_player(id) else {
            return false;
        };
        match &self.persistence {
            Some(persistence) => {
                persistence.save_player(save);
                true
            }
            None => {
                debug!("No persistence configured, skipping save of {}", id);
                false
            }
        }
    }

    /// Privileged stat override used by admin tools
    pub fn set_stat(&mut self, id: EntityId, stat: Stat, value: u32) -> bool {
        let Some(living) = self.livings.get_mut(&id) else {
            return false;
        };
        living.set_stat(stat, value);
        self.ensure_active(id);
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mud_shared::find_monster_template;

    /// Deterministic world with no queued rolls
    pub(crate) fn test_world() -> GameWorld {
        GameWorld::new(EngineConfig {
            rng_seed: Some(7),
            ..EngineConfig::default()
        })
    }

    /// Generic living with default stats in room 1
    pub(crate) fn spawn_generic(world: &mut GameWorld, name: &str) -> EntityId {
        world.spawn_living(name, LivingKind::Generic, Stats::default(), Some(1))
    }

    #[test]
    fn test_co_location() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        assert!(world.co_located(a, b));
        world.move_living(b, 2);
        assert!(!world.co_located(a, b));
        assert!(!world.co_located(a, 999));
    }

    #[test]
    fn test_aggressive_monster_attacks_arriving_player() {
        let mut world = test_world();
        let goblin = world.spawn_monster(&find_monster_template("goblin").unwrap(), 5);
        let rat = world.spawn_monster(&find_monster_template("rat").unwrap(), 5);
        let player = world.spawn_player("Hero", 1);

        world.move_living(player, 5);

        assert_eq!(world.living(goblin).unwrap().attacker, Some(player));
        assert!(world.living(rat).unwrap().attacker.is_none());
        // Mutual engagement
        assert_eq!(world.living(player).unwrap().attacker, Some(goblin));
        assert!(world.is_scheduled(goblin));
        assert!(world.is_scheduled(player));
    }

    #[test]
    fn test_tick_for_destroyed_entity_is_dropped() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.living_mut(a).unwrap().lose_hp(5);
        world.ensure_active(a);
        world.despawn(a);
        world.pulse();
        assert!(!world.is_scheduled(a));
    }

    #[test]
    fn test_idle_living_is_descheduled() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.living_mut(a).unwrap().lose_hp(1);
        world.ensure_active(a);
        world.pulse();
        assert_eq!(world.living(a).unwrap().hp(), 15);
        assert!(!world.is_scheduled(a));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        let sword = world.give_item(hero, 5).unwrap();
        let helm = world.give_item(hero, 21).unwrap();
        world.give_item(hero, 1).unwrap();
        world.wield(hero, sword).unwrap();
        world.wear(hero, helm).unwrap();
        world.living_mut(hero).unwrap().set_skill("sword", 12);
        world.living_mut(hero).unwrap().lose_hp(4);

        let save = world.snapshot_player(hero).unwrap();
        assert_eq!(save.inventory, vec![1]);
        assert_eq!(save.wielded, Some(5));
        assert_eq!(save.worn, vec![21]);
        assert_eq!(save.hp, 11);

        let mut other = test_world();
        let restored = other.spawn_player_from_save(&save);
        let living = other.living(restored).unwrap();
        assert_eq!(living.skill("sword"), 12);
        assert_eq!(living.hp(), 11);
        assert_eq!(living.inventory.len(), 3);
        assert!(living.wielded.is_some());
        assert_eq!(other.total_armor(restored), 2);
        assert_eq!(other.snapshot_player(restored).unwrap(), save);
        assert!(other.is_scheduled(restored));
    }

    #[test]
    fn test_pick_up_from_room() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        let ale = world.clone_item(1, ItemLocation::Room(3)).unwrap();
        let far = world.clone_item(5, ItemLocation::Room(4)).unwrap();

        assert_eq!(world.find_item_in_room(3, "ale"), Some(ale));
        assert_eq!(world.pick_up(hero, far), Err(EngineError::InvalidTarget));
        world.pick_up(hero, ale).unwrap();
        assert_eq!(world.item(ale).unwrap().location, ItemLocation::Carried(hero));
        assert_eq!(world.living(hero).unwrap().inventory, vec![ale]);
        assert!(world.find_item_in_room(3, "ale").is_none());
    }
}
