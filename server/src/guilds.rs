//! Guild membership.
//!
//! Joining adds the guild's skills to the player's allowed set and teaches
//! its spells. Leaving takes back whatever no remaining guild still grants;
//! skill points already earned are kept.

use std::collections::BTreeSet;

use log::info;

use mud_shared::{get_guild, get_spell_by_id, GuildDef};

use crate::entities::{capitalize, EntityId, LivingKind};
use crate::error::{EngineError, EngineResult};
use crate::world::GameWorld;

fn spell_names(ids: &[u32]) -> String {
    ids.iter()
        .filter_map(|id| get_spell_by_id(*id))
        .map(|spell| capitalize(&spell.name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl GameWorld {
    /// Guilds the player belongs to, in join order
    pub fn guild_memberships(&self, id: EntityId) -> Vec<GuildDef> {
        self.livings
            .get(&id)
            .and_then(|l| l.player_data())
            .map(|data| data.guilds.iter().filter_map(|key| get_guild(key)).collect())
            .unwrap_or_default()
    }

    pub fn join_guild(&mut self, id: EntityId, key: &str) -> EngineResult<()> {
        let guild = get_guild(key).ok_or_else(|| EngineError::UnknownGuild(key.to_string()))?;
        let current = self.guild_memberships(id);

        let living = self.livings.get_mut(&id).ok_or(EngineError::UnknownEntity(id))?;
        let LivingKind::Player(data) = &mut living.kind else {
            return Err(EngineError::InvalidTarget);
        };
        if data.is_member(&guild.key) {
            return Err(EngineError::AlreadyMember(guild.name));
        }
        if let Some(other) = current.iter().find(|other| other.conflicts_with(&guild)) {
            return Err(EngineError::GuildConflict(other.name.clone(), guild.name));
        }

        data.guilds.push(guild.key.clone());
        living.allowed_skills.extend(guild.granted_skills.iter().cloned());
        living.known_spells.extend(guild.granted_spells.iter().copied());
        let (name, room) = (living.name.clone(), living.room);

        info!("{} ({}) joined the {}", name, id, guild.name);
        self.tell(id, format!("You are now a member of the {}!", guild.name));
        self.tell(id, format!("You can now train: {}", guild.granted_skills.join(", ")));
        self.tell(id, guild.welcome.clone());
        if !guild.granted_spells.is_empty() {
            self.tell(id, format!("You have learned: {}", spell_names(&guild.granted_spells)));
        }
        if let Some(room) = room {
            self.tell_room(room, format!("{} joins the {}.", name, guild.name), &[id]);
        }
        Ok(())
    }

    pub fn leave_guild(&mut self, id: EntityId, key: &str) -> EngineResult<()> {
        let guild = get_guild(key).ok_or_else(|| EngineError::UnknownGuild(key.to_string()))?;
        let remaining: Vec<GuildDef> = self
            .guild_memberships(id)
            .into_iter()
            .filter(|g| g.key != guild.key)
            .collect();
        let kept_skills: BTreeSet<&String> = remaining.iter().flat_map(|g| &g.granted_skills).collect();
        let kept_spells: BTreeSet<u32> = remaining.iter().flat_map(|g| g.granted_spells.iter().copied()).collect();

        let living = self.livings.get_mut(&id).ok_or(EngineError::UnknownEntity(id))?;
        let LivingKind::Player(data) = &mut living.kind else {
            return Err(EngineError::InvalidTarget);
        };
        if !data.is_member(&guild.key) {
            return Err(EngineError::NotMember(guild.name));
        }

        data.guilds.retain(|g| *g != guild.key);
        let lost: Vec<String> = guild
            .granted_skills
            .iter()
            .filter(|skill| !kept_skills.contains(skill))
            .cloned()
            .collect();
        for skill in &lost {
            living.allowed_skills.remove(skill);
        }
        for spell in guild.granted_spells.iter().filter(|s| !kept_spells.contains(*s)) {
            living.known_spells.remove(spell);
        }
        let (name, room) = (living.name.clone(), living.room);

        info!("{} ({}) left the {}", name, id, guild.name);
        self.tell(id, format!("You have left the {}.", guild.name));
        if !lost.is_empty() {
            self.tell(id, format!("You can no longer advance: {}", lost.join(", ")));
        }
        self.tell(id, guild.farewell.clone());
        if let Some(room) = room {
            self.tell_room(room, format!("{} leaves the {}.", name, guild.name), &[id]);
        }
        Ok(())
    }
}
