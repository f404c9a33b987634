//! Per-tick attack resolution between two livings.
//!
//! Each engaged living resolves its own attack on its own heartbeat; there
//! is no shared round, so one side can land extra blows before the other's
//! tick fires.

use log::debug;

use mud_shared::{GameEvent, Stat, DODGE, UNARMED};

use crate::entities::{CombatState, EntityId};
use crate::world::GameWorld;

const BASE_HIT_CHANCE: i64 = 30;
const MIN_HIT_CHANCE: i64 = 5;
const MAX_HIT_CHANCE: i64 = 95;

/// Intoxication lost per heartbeat
pub const INTOXICATION_DECAY: i32 = 2;

/// Everything the hit roll depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct HitInputs {
    pub dex: u32,
    pub weapon_skill: u32,
    pub intoxication: u32,
    pub target_agi: u32,
    pub target_dodge: u32,
    /// Percent, from the target's worn armor
    pub target_dodge_penalty: u32,
}

/// Dodge skill after the armor penalty, floored
pub fn effective_dodge(dodge: u32, penalty: u32) -> u32 {
    dodge * (100 - penalty.min(100)) / 100
}

/// Percent chance to hit, always within `5..=95`
pub fn hit_chance(inputs: HitInputs) -> u32 {
    let dodge = effective_dodge(inputs.target_dodge, inputs.target_dodge_penalty) as i64;
    let chance = BASE_HIT_CHANCE + 2 * inputs.dex as i64 + inputs.weapon_skill as i64 / 2
        - 2 * inputs.target_agi as i64
        - dodge / 3
        - inputs.intoxication as i64 / 2;
    chance.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE) as u32
}

/// Base damage of a bare-handed blow
pub fn unarmed_base(str: u32) -> u32 {
    1 + str / 3
}

/// Damage before armor: strength bonus, then the weapon skill multiplier
pub fn attack_damage(base: u32, str: u32, weapon_skill: u32) -> u32 {
    let raw = (base + str / 2) as u64 * (100 + 2 * weapon_skill as u64) / 100;
    raw.min(u32::MAX as u64) as u32
}

/// Armor soaks damage but a landed blow always does at least 1
pub fn mitigate(damage: u32, armor: u32) -> u32 {
    damage.saturating_sub(armor).max(1)
}

/// Skill advancement difficulty scales with the target's toughness
pub fn advancement_difficulty(target_max_hp: u32) -> u32 {
    (5 + target_max_hp / 5).clamp(5, 20)
}

impl GameWorld {
    /// Engage `target`. Mutual: an idle target fights back.
    /// Returns false when the target is invalid or already engaged with us.
    pub fn start_combat(&mut self, id: EntityId, target: EntityId) -> bool {
        if id == target || !self.is_alive(id) || !self.is_alive(target) {
            return false;
        }
        let Some(living) = self.livings.get_mut(&id) else {
            return false;
        };
        if living.combat_state == CombatState::Engaged && living.attacker == Some(target) {
            return false;
        }

        living.attacker = Some(target);
        living.combat_state = CombatState::Engaged;
        debug!("{} engages {}", id, target);
        self.ensure_active(id);

        let target_idle = self
            .livings
            .get(&target)
            .map_or(false, |t| t.combat_state == CombatState::Idle);
        if target_idle {
            self.start_combat(target, id);
        }
        true
    }

    pub fn stop_combat(&mut self, id: EntityId) {
        if let Some(living) = self.livings.get_mut(&id) {
            living.attacker = None;
            living.combat_state = CombatState::Idle;
        }
    }

    pub fn query_in_combat(&self, id: EntityId) -> bool {
        self.livings.get(&id).map_or(false, |l| l.in_combat())
    }

    pub fn query_attacker(&self, id: EntityId) -> Option<EntityId> {
        self.livings.get(&id).and_then(|l| l.attacker)
    }

    /// Skill trained by the wielded weapon, or unarmed
    pub fn weapon_skill_name(&self, id: EntityId) -> String {
        self.wielded_weapon(id)
            .map(|weapon| weapon.skill_type.clone())
            .unwrap_or_else(|| UNARMED.to_string())
    }

    pub fn query_hit_chance(&self, id: EntityId, target: EntityId) -> Option<u32> {
        let attacker = self.livings.get(&id)?;
        let defender = self.livings.get(&target)?;
        let skill = self.weapon_skill_name(id);
        Some(hit_chance(HitInputs {
            dex: attacker.stat(Stat::Dex),
            weapon_skill: attacker.skill(&skill),
            intoxication: attacker.intoxication(),
            target_agi: defender.stat(Stat::Agi),
            target_dodge: defender.skill(DODGE),
            target_dodge_penalty: self.total_dodge_penalty(target),
        }))
    }

    /// Damage a landed blow would do before the target's armor
    pub fn query_damage(&self, id: EntityId) -> Option<u32> {
        let living = self.livings.get(&id)?;
        let str = living.stat(Stat::Str);
        let base = self
            .wielded_weapon(id)
            .map(|weapon| weapon.damage)
            .unwrap_or_else(|| unarmed_base(str));
        let skill = living.skill(&self.weapon_skill_name(id));
        Some(attack_damage(base, str, skill))
    }

    /// Apply armor-mitigated damage without running death.
    /// Returns `(actual, killed)`; `(0, false)` for dead or missing targets.
    pub(crate) fn apply_damage(&mut self, target: EntityId, amount: u32) -> (u32, bool) {
        let armor = self.total_armor(target);
        let Some(living) = self.livings.get_mut(&target) else {
            return (0, false);
        };
        if !living.is_alive() {
            return (0, false);
        }
        let actual = mitigate(amount, armor);
        let hp = living.lose_hp(actual);
        self.ensure_active(target);
        (actual, hp == 0)
    }

    /// Take damage from `source`. Death fires at most once.
    pub fn receive_damage(&mut self, target: EntityId, amount: u32, source: Option<EntityId>) -> u32 {
        let (actual, killed) = self.apply_damage(target, amount);
        if killed {
            self.die(target, source);
        }
        actual
    }

    /// Resolve this living's attack for the current heartbeat
    pub fn do_attack(&mut self, id: EntityId) {
        let Some(target) = self.query_attacker(id) else {
            self.stop_combat(id);
            return;
        };
        if !self.is_alive(target) || !self.co_located(id, target) {
            debug!("{} loses track of {}", id, target);
            self.stop_combat(id);
            return;
        }

        self.resolve_attack(id, target);

        if let Some(living) = self.livings.get_mut(&id) {
            living.adjust_intoxication(-INTOXICATION_DECAY);
        }
    }

    fn resolve_attack(&mut self, id: EntityId, target: EntityId) {
        let (Some(chance), Some(damage)) = (self.query_hit_chance(id, target), self.query_damage(id)) else {
            return;
        };
        let (attacker_name, target_name, target_max_hp, room) =
            match (self.livings.get(&id), self.livings.get(&target)) {
                (Some(a), Some(t)) => (a.display_name(), t.short.clone(), t.max_hp(), a.room),
                _ => return,
            };
        let skill = self.weapon_skill_name(id);
        let difficulty = advancement_difficulty(target_max_hp);

        let roll = self.dice.roll(100);
        if roll < chance {
            let (actual, killed) = self.apply_damage(target, damage);
            let target_new_health = self.livings.get(&target).map_or(0, |t| t.hp());

            self.tell(id, format!("You hit {} for {} damage.", target_name, actual));
            self.tell(target, format!("{} hits you for {} damage.", attacker_name, actual));
            if let Some(room) = room {
                self.tell_room(room, format!("{} hits {}.", attacker_name, target_name), &[id, target]);
            }
            self.emit(GameEvent::DamageEvent {
                attacker_id: id,
                target_id: target,
                damage: actual,
                target_new_health,
            });

            self.train(id, &skill, difficulty);

            if killed {
                self.die(target, Some(id));
                self.stop_combat(id);
            }
        } else {
            self.tell(id, format!("You miss {}.", target_name));
            self.tell(target, format!("{} misses you.", attacker_name));
            if let Some(room) = room {
                self.tell_room(room, format!("{} misses {}.", attacker_name, target_name), &[id, target]);
            }
            self.emit(GameEvent::MissEvent {
                attacker_id: id,
                target_id: target,
            });

            self.train(target, DODGE, difficulty);
            self.train(id, &skill, difficulty / 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::{spawn_generic, test_world};
    use mud_shared::{find_monster_template, Stats};

    fn count_deaths(events: &[GameEvent], entity: EntityId) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityDeath { entity_id, .. } if *entity_id == entity))
            .count()
    }

    #[test]
    fn test_worked_example() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");

        assert_eq!(world.query_hit_chance(a, b), Some(30));
        assert_eq!(world.query_damage(a), Some(1));
        assert_eq!(world.receive_damage(b, 1, Some(a)), 1);
        assert_eq!(world.living(b).unwrap().hp(), 14);
    }

    #[test]
    fn test_hit_chance_clamps() {
        let strong = HitInputs { dex: 1000, weapon_skill: 1000, ..HitInputs::default() };
        assert_eq!(hit_chance(strong), 95);

        let hopeless = HitInputs {
            dex: 1,
            intoxication: 100,
            target_agi: 1000,
            target_dodge: 1000,
            ..HitInputs::default()
        };
        assert_eq!(hit_chance(hopeless), 5);
    }

    #[test]
    fn test_heavy_armor_reduces_dodge() {
        assert_eq!(effective_dodge(30, 0), 30);
        assert_eq!(effective_dodge(30, 25), 22);
        assert_eq!(effective_dodge(30, 250), 0);

        let base = HitInputs { dex: 10, target_dodge: 30, ..HitInputs::default() };
        let armored = HitInputs { target_dodge_penalty: 25, ..base };
        // 30 + 20 - 10 vs 30 + 20 - 7
        assert_eq!(hit_chance(base), 40);
        assert_eq!(hit_chance(armored), 43);
    }

    #[test]
    fn test_damage_scales_with_skill() {
        assert_eq!(attack_damage(unarmed_base(10), 10, 0), 9);
        assert_eq!(attack_damage(unarmed_base(10), 10, 50), 18);
        assert_eq!(attack_damage(10, 4, 25), 18);
    }

    #[test]
    fn test_armor_floor() {
        let mut world = test_world();
        let b = spawn_generic(&mut world, "b");
        let mail = world.give_item(b, 22).unwrap();
        world.wear(b, mail).unwrap();

        assert_eq!(world.receive_damage(b, 3, None), 1);
        assert_eq!(world.receive_damage(b, 8, None), 3);
        assert_eq!(world.living(b).unwrap().hp(), 11);
    }

    #[test]
    fn test_death_fires_once() {
        let mut world = test_world();
        let b = spawn_generic(&mut world, "b");
        world.living_mut(b).unwrap().set_hp(5);

        assert_eq!(world.receive_damage(b, 50, None), 50);
        assert_eq!(world.living(b).unwrap().hp(), 0);
        assert_eq!(world.receive_damage(b, 50, None), 0);

        let events = world.drain_events();
        assert_eq!(count_deaths(&events, b), 1);
    }

    #[test]
    fn test_start_combat_rules() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");

        assert!(!world.start_combat(a, a));
        assert!(!world.start_combat(a, 999));
        assert!(world.start_combat(a, b));
        assert_eq!(world.query_attacker(b), Some(a));
        assert!(world.query_in_combat(b));
        assert!(!world.start_combat(a, b));

        world.stop_combat(a);
        assert!(!world.query_in_combat(a));
        assert!(world.query_attacker(a).is_none());
    }

    #[test]
    fn test_hit_resolution() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        world.living_mut(a).unwrap().adjust_intoxication(5);
        world.start_combat(a, b);

        // hit, then a failed unarmed advancement
        world.dice.push_rolls(&[0, 99]);
        world.do_attack(a);

        assert_eq!(world.living(b).unwrap().hp(), 14);
        assert_eq!(world.living(a).unwrap().skill("unarmed"), 0);
        assert_eq!(world.living(a).unwrap().intoxication(), 3);
        assert_eq!(world.dice.queued(), 0);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::DamageEvent {
            attacker_id: a,
            target_id: b,
            damage: 1,
            target_new_health: 14,
        }));
    }

    #[test]
    fn test_miss_trains_dodge_and_weapon() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        world.start_combat(a, b);

        // miss, dodge gain, dodge stat roll fails, attacker gain, two stat rolls fail
        world.dice.push_rolls(&[99, 0, 99, 0, 99, 99]);
        world.do_attack(a);

        assert_eq!(world.living(b).unwrap().hp(), 15);
        assert_eq!(world.living(b).unwrap().skill("dodge"), 1);
        assert_eq!(world.living(a).unwrap().skill("unarmed"), 1);
        assert_eq!(world.dice.queued(), 0);
        assert!(world
            .drain_events()
            .contains(&GameEvent::MissEvent { attacker_id: a, target_id: b }));
    }

    #[test]
    fn test_stale_target_disengages() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        world.start_combat(a, b);
        world.despawn(b);

        world.do_attack(a);
        assert!(!world.query_in_combat(a));
    }

    #[test]
    fn test_target_out_of_room_disengages() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        let b = spawn_generic(&mut world, "b");
        world.start_combat(a, b);
        world.move_living(b, 9);

        world.do_attack(a);
        assert!(!world.query_in_combat(a));
        assert_eq!(world.living(b).unwrap().hp(), 15);
    }

    #[test]
    fn test_killing_blow_runs_death_and_disengages() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        let rat = world.spawn_monster(&find_monster_template("rat").unwrap(), 3);
        world.living_mut(rat).unwrap().set_hp(1);
        world.start_combat(hero, rat);

        // hit, failed advancement, then the drop roll misses
        world.dice.push_rolls(&[0, 99, 99]);
        world.do_attack(hero);

        assert!(world.living(rat).is_none());
        assert!(!world.query_in_combat(hero));
        assert_eq!(world.living(hero).unwrap().player_data().unwrap().xp, 5);
        assert_eq!(world.corpses_in_room(3).len(), 1);
    }

    #[test]
    fn test_same_seed_same_fight() {
        let fight = || {
            let mut world = test_world();
            let a = world.spawn_living("a", crate::entities::LivingKind::Generic, Stats { str: 4, dex: 3, con: 6, ..Stats::default() }, Some(1));
            let b = world.spawn_living("b", crate::entities::LivingKind::Generic, Stats { agi: 3, con: 6, ..Stats::default() }, Some(1));
            world.start_combat(a, b);
            for _ in 0..10 {
                world.pulse();
            }
            let a = world.living(a).unwrap();
            let b = world.living(b).unwrap();
            (a.hp(), b.hp(), a.skill("unarmed"), b.skill("dodge"))
        };
        assert_eq!(fight(), fight());
    }
}
