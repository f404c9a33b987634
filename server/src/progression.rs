//! Probabilistic skill and stat advancement with diminishing returns.

use log::debug;

use mud_shared::{skill_category, Stat};

use crate::entities::EntityId;
use crate::world::GameWorld;

/// Percent chance to gain a skill point at `current` skill.
/// Falls off with every ten points already learned.
pub fn skill_gain_chance(current: u32, difficulty: u32) -> f64 {
    let divisor = 1 + current / 10;
    (30.0 / divisor as f64 * difficulty as f64 / 10.0).clamp(1.0, 50.0)
}

/// Odds of a stat gain, on whichever scale keeps them above zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOdds {
    /// Out of 100
    Percent(u32),
    /// Out of 1000, used once the percent chance rounds to zero
    Permille(u32),
}

pub fn stat_gain_odds(current: u32) -> StatOdds {
    let divisor = 1 + current / 3;
    match 5 / divisor {
        0 => StatOdds::Permille((50 / divisor).max(1)),
        percent => StatOdds::Percent(percent),
    }
}

impl GameWorld {
    pub fn query_skill(&self, id: EntityId, skill: &str) -> u32 {
        self.livings.get(&id).map_or(0, |l| l.skill(skill))
    }

    /// Privileged skill override
    pub fn set_skill(&mut self, id: EntityId, skill: &str, value: u32) -> bool {
        match self.livings.get_mut(&id) {
            Some(living) => {
                living.set_skill(skill, value);
                true
            }
            None => false,
        }
    }

    pub fn can_use_skill(&self, id: EntityId, skill: &str) -> bool {
        self.livings.get(&id).map_or(false, |l| l.can_use_skill(skill))
    }

    /// Try to raise a skill by one point. Skills the living may not train
    /// never roll.
    pub fn advance_skill(&mut self, id: EntityId, skill: &str, difficulty: u32) -> bool {
        let current = match self.livings.get(&id) {
            Some(living) if living.can_use_skill(skill) => living.skill(skill),
            _ => return false,
        };

        let chance = skill_gain_chance(current, difficulty);
        if (self.dice.roll(100) as f64) >= chance {
            return false;
        }

        let value = current.saturating_add(1);
        if let Some(living) = self.livings.get_mut(&id) {
            living.set_skill(skill, value);
        }
        debug!("{} advanced {} to {}", id, skill, value);
        self.tell(id, format!("[Your {} skill improves!]", skill));
        true
    }

    /// Try to raise a stat by one point
    pub fn advance_stat(&mut self, id: EntityId, stat: Stat) -> bool {
        let Some(current) = self.livings.get(&id).map(|l| l.stat(stat)) else {
            return false;
        };

        let gained = match stat_gain_odds(current) {
            StatOdds::Percent(percent) => self.dice.roll(100) < percent,
            StatOdds::Permille(permille) => self.dice.roll(1000) < permille,
        };
        if !gained {
            return false;
        }

        let value = current.saturating_add(1);
        if let Some(living) = self.livings.get_mut(&id) {
            living.set_stat(stat, value);
        }
        if matches!(stat, Stat::Con | Stat::Int) {
            // New headroom to regenerate into
            self.ensure_active(id);
        }
        debug!("{} advanced {} to {}", id, stat.name(), value);
        self.tell(id, format!("[Your {} increases!]", stat.name()));
        true
    }

    /// Roll each stat trained by this skill's category independently.
    /// Returns the stats that improved.
    pub fn advance_stats_for_skill(&mut self, id: EntityId, skill: &str) -> Vec<Stat> {
        let Some(category) = skill_category(skill) else {
            return Vec::new();
        };
        category
            .trained_stats()
            .iter()
            .copied()
            .filter(|stat| self.advance_stat(id, *stat))
            .collect()
    }

    /// Practice a skill: on a gain, the related stats get a chance too
    pub(crate) fn train(&mut self, id: EntityId, skill: &str, difficulty: u32) -> bool {
        if !self.advance_skill(id, skill, difficulty) {
            return false;
        }
        self.advance_stats_for_skill(id, skill);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::{spawn_generic, test_world};

    #[test]
    fn test_skill_chance_table() {
        assert_eq!(skill_gain_chance(0, 10), 30.0);
        assert_eq!(skill_gain_chance(50, 10), 5.0);
        assert!((skill_gain_chance(100, 10) - 2.727).abs() < 0.01);
        assert_eq!(skill_gain_chance(0, 100), 50.0);
        assert_eq!(skill_gain_chance(1000, 1), 1.0);
    }

    #[test]
    fn test_skill_chance_never_increases() {
        for difficulty in [1, 5, 10, 20, 25] {
            let mut previous = f64::MAX;
            for current in 0..300 {
                let chance = skill_gain_chance(current, difficulty);
                assert!(chance <= previous, "skill {} difficulty {}", current, difficulty);
                previous = chance;
            }
        }
    }

    #[test]
    fn test_stat_odds_scales() {
        assert_eq!(stat_gain_odds(1), StatOdds::Percent(5));
        assert_eq!(stat_gain_odds(3), StatOdds::Percent(2));
        assert_eq!(stat_gain_odds(6), StatOdds::Percent(1));
        assert_eq!(stat_gain_odds(15), StatOdds::Permille(8));
        assert_eq!(stat_gain_odds(300), StatOdds::Permille(1));
    }

    #[test]
    fn test_disallowed_skill_does_not_roll() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        world.dice.push_rolls(&[0]);

        assert!(!world.advance_skill(hero, "sword", 20));
        assert_eq!(world.dice.queued(), 1);
        assert!(world.advance_skill(hero, "dodge", 20));
        assert_eq!(world.query_skill(hero, "dodge"), 1);
    }

    #[test]
    fn test_skill_gain_boundary() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        // 30% at skill 0, difficulty 10
        world.dice.push_rolls(&[30, 29]);
        assert!(!world.advance_skill(a, "sword", 10));
        assert!(world.advance_skill(a, "sword", 10));
        assert_eq!(world.query_skill(a, "sword"), 1);
    }

    #[test]
    fn test_con_gain_raises_max_hp() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.dice.push_rolls(&[0]);

        assert!(world.advance_stat(a, Stat::Con));
        let living = world.living(a).unwrap();
        assert_eq!(living.stat(Stat::Con), 2);
        assert_eq!(living.max_hp(), 20);
        assert_eq!(living.hp(), 15);
        assert!(world.is_scheduled(a));
    }

    #[test]
    fn test_high_stat_uses_permille() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.living_mut(a).unwrap().set_stat(Stat::Wis, 15);

        world.dice.push_rolls(&[8, 7]);
        assert!(!world.advance_stat(a, Stat::Wis));
        assert!(world.advance_stat(a, Stat::Wis));
        assert_eq!(world.living(a).unwrap().stat(Stat::Wis), 16);
    }

    #[test]
    fn test_stats_for_skill_roll_independently() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.dice.push_rolls(&[0, 99]);

        assert_eq!(world.advance_stats_for_skill(a, "sword"), vec![Stat::Str]);
        assert_eq!(world.living(a).unwrap().stat(Stat::Dex), 1);
        assert!(world.advance_stats_for_skill(a, "knitting").is_empty());
        assert_eq!(world.dice.queued(), 0);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut world = test_world();
        let a = spawn_generic(&mut world, "a");
        world.set_skill(a, "sword", u32::MAX);
        assert!(world.set_stat(a, Stat::Con, 1_000_000_000));
        world.living_mut(a).unwrap().set_stat(Stat::Str, u32::MAX);

        world.dice.push_rolls(&[0, 0]);
        assert!(world.advance_skill(a, "sword", 10));
        assert_eq!(world.query_skill(a, "sword"), u32::MAX);
        assert!(world.advance_stat(a, Stat::Str));
        assert_eq!(world.living(a).unwrap().stat(Stat::Str), u32::MAX);
        assert_eq!(world.query_max_hp(a), Some(u32::MAX));
    }
}
