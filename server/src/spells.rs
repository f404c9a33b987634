//! Learning and casting spells.
//!
//! Every refusal is checked before mana is spent. Once mana is gone the
//! cast either fizzles against worn armor or resolves its effect, and the
//! school skill gets a chance to advance either way.

use log::debug;

use mud_shared::{get_spell_by_id, GameEvent, SpellDef, SpellEffect, Stat};

use crate::entities::EntityId;
use crate::error::{EngineError, EngineResult};
use crate::world::GameWorld;

/// Advancement difficulty of a cast that fizzled
const FIZZLE_DIFFICULTY: u32 = 5;

/// Result of a cast that got past its checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// Armor broke the spell; mana was still spent
    Fizzled,
    Damaged { target: EntityId, amount: u32 },
    Healed { target: EntityId, amount: u32 },
}

/// Spell strength from school skill and intelligence
pub fn spell_power(skill: u32, int: u32) -> u32 {
    skill.saturating_add(int / 2).saturating_add(10)
}

/// Advancement difficulty of a successful cast
pub fn cast_difficulty(spell: &SpellDef) -> u32 {
    (10 + spell.min_skill).min(25)
}

impl GameWorld {
    fn school_requirement(&self, id: EntityId, spell: &SpellDef, required: u32) -> EngineResult<()> {
        let living = self.livings.get(&id).ok_or(EngineError::UnknownEntity(id))?;
        if !living.can_use_skill(&spell.school) {
            return Err(EngineError::SkillNotAllowed(spell.school.clone()));
        }
        if living.skill(&spell.school) < required {
            return Err(EngineError::SkillTooLow {
                skill: spell.school.clone(),
                required,
            });
        }
        Ok(())
    }

    /// Learn a spell. Returns false if it was already known.
    pub fn learn_spell(&mut self, id: EntityId, spell_id: u32) -> EngineResult<bool> {
        let spell = get_spell_by_id(spell_id).ok_or(EngineError::UnknownSpell)?;
        self.school_requirement(id, &spell, spell.learn_skill)?;

        let newly_learned = self
            .livings
            .get_mut(&id)
            .map_or(false, |living| living.known_spells.insert(spell.id));
        if newly_learned {
            self.tell(id, format!("You learn the {} spell.", spell.name));
        }
        Ok(newly_learned)
    }

    /// Resolve who a spell lands on, or refuse it
    fn spell_target(&self, id: EntityId, spell: &SpellDef, target: Option<EntityId>) -> EngineResult<EntityId> {
        let target = match spell.effect {
            SpellEffect::Bolt { .. } => {
                let target = target.or_else(|| self.query_attacker(id)).ok_or(EngineError::InvalidTarget)?;
                if target == id {
                    return Err(EngineError::InvalidTarget);
                }
                target
            }
            SpellEffect::Heal => target.unwrap_or(id),
            SpellEffect::Ward => match target {
                Some(other) if other != id => return Err(EngineError::InvalidTarget),
                _ => id,
            },
        };
        if !self.is_alive(target) || (target != id && !self.co_located(id, target)) {
            return Err(EngineError::InvalidTarget);
        }
        Ok(target)
    }

    /// Cast a known spell. Offensive spells default to the current
    /// opponent, others to the caster.
    pub fn cast(&mut self, id: EntityId, spell_id: u32, target: Option<EntityId>) -> EngineResult<CastOutcome> {
        let spell = get_spell_by_id(spell_id).ok_or(EngineError::UnknownSpell)?;
        let living = self.livings.get(&id).ok_or(EngineError::UnknownEntity(id))?;
        if !living.known_spells.contains(&spell.id) {
            return Err(EngineError::SpellNotKnown);
        }
        self.school_requirement(id, &spell, spell.min_skill)?;
        let target = self.spell_target(id, &spell, target)?;

        let (skill, int) = match self.livings.get_mut(&id) {
            Some(living) => {
                let available = living.mana();
                if !living.use_mana(spell.mana_cost) {
                    return Err(EngineError::ResourceExhausted {
                        needed: spell.mana_cost,
                        available,
                    });
                }
                (living.skill(&spell.school), living.stat(Stat::Int))
            }
            None => return Err(EngineError::UnknownEntity(id)),
        };
        self.ensure_active(id);

        let failure = self.total_spell_failure(id);
        if failure > 0 && self.dice.roll(100) < failure {
            debug!("{} fizzled {}", id, spell.name);
            self.tell(id, "Your armor interferes with the spell! The magic fizzles.");
            self.train(id, &spell.school, FIZZLE_DIFFICULTY);
            return Ok(CastOutcome::Fizzled);
        }

        let power = spell_power(skill, int);
        let outcome = match spell.effect {
            SpellEffect::Bolt { variable } => {
                let mut damage = power / 4 * 2;
                if variable {
                    damage += self.dice.roll(power / 2);
                }
                self.cast_bolt(id, &spell, target, damage)
            }
            SpellEffect::Heal => {
                let amount = power / 2 + self.dice.roll(power / 2);
                self.cast_heal(id, &spell, target, amount)
            }
            SpellEffect::Ward => {
                let amount = (power / 4 + self.dice.roll(power / 4)).max(2);
                self.tell(id, "You conjure a shimmering magical shield around yourself.");
                self.cast_heal(id, &spell, id, amount)
            }
        };

        self.train(id, &spell.school, cast_difficulty(&spell));
        Ok(outcome)
    }

    fn cast_bolt(&mut self, id: EntityId, spell: &SpellDef, target: EntityId, damage: u32) -> CastOutcome {
        let (caster_name, room) = self.livings.get(&id).map_or((String::new(), None), |l| (l.display_name(), l.room));
        let target_name = self.livings.get(&target).map(|l| l.short.clone()).unwrap_or_default();

        self.tell(id, format!("You cast {} at {}!", spell.name, target_name));
        self.tell(target, format!("{} casts {} at you!", caster_name, spell.name));
        if let Some(room) = room {
            self.tell_room(room, format!("{} casts {} at {}!", caster_name, spell.name, target_name), &[id, target]);
        }

        let (actual, killed) = self.apply_damage(target, damage);
        let target_new_health = self.livings.get(&target).map_or(0, |t| t.hp());
        self.tell(id, format!("The {} deals {} damage!", spell.name, actual));
        self.emit(GameEvent::DamageEvent {
            attacker_id: id,
            target_id: target,
            damage: actual,
            target_new_health,
        });

        if killed {
            self.die(target, Some(id));
        } else if self.query_attacker(id) != Some(target) {
            self.start_combat(id, target);
        }
        CastOutcome::Damaged { target, amount: actual }
    }

    fn cast_heal(&mut self, id: EntityId, spell: &SpellDef, target: EntityId, amount: u32) -> CastOutcome {
        let restored = self.livings.get_mut(&target).map_or(0, |l| l.heal(amount));
        if target == id {
            self.tell(id, format!("Your {} restores {} health.", spell.name, restored));
        } else {
            let caster_name = self.livings.get(&id).map(|l| l.display_name()).unwrap_or_default();
            self.tell(id, format!("Your {} restores {} health.", spell.name, restored));
            self.tell(target, format!("{} heals you for {} health.", caster_name, restored));
        }
        self.stop_if_idle(target);
        CastOutcome::Healed { target, amount: restored }
    }
}
