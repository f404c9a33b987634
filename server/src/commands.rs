//! Text command system for player and admin commands.
//!
//! Every command runs on behalf of one explicit actor. Names are resolved
//! against the actor's room and inventory only.

use mud_shared::{get_spell_by_id, get_spell_definitions, guild_in_room, SpellDef, Stat};

use crate::entities::{capitalize, EntityId, ItemId, RoomId};
use crate::error::EngineError;
use crate::spells::CastOutcome;
use crate::world::GameWorld;

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command was successful
    pub success: bool,
    /// Message to display to the actor
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Success whose outcome the engine already reported as events
    pub fn done() -> Self {
        Self::success("")
    }
}

impl From<EngineError> for CommandResult {
    fn from(e: EngineError) -> Self {
        Self::error(capitalize(&format!("{}.", e)))
    }
}

/// Parse and execute a command line for `actor`.
/// Returns None for blank input.
pub fn parse_and_execute(
    content: &str,
    actor: EntityId,
    is_admin: bool,
    world: &mut GameWorld,
) -> Option<CommandResult> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    if world.living(actor).is_none() {
        return Some(CommandResult::error("You are not in the world"));
    }

    Some(match command.as_str() {
        // === All player commands ===
        "help" => cmd_help(is_admin),
        "look" | "l" => cmd_look(actor, world),
        "go" => cmd_go(actor, args, world),
        "get" | "take" => cmd_get(actor, args, world),
        "join" => cmd_join(actor, world),
        "leave" => cmd_leave(actor, world),
        "guilds" => cmd_guilds(actor, world),
        "kill" | "attack" => cmd_kill(actor, args, world),
        "stop" => cmd_stop(actor, world),
        "wield" => cmd_wield(actor, args, world),
        "unwield" => cmd_unwield(actor, world),
        "wear" => cmd_wear(actor, args, world),
        "remove" => cmd_remove(actor, args, world),
        "drink" => cmd_drink(actor, args, world),
        "cast" => cmd_cast(actor, args, world),
        "learn" => cmd_learn(actor, args, world),
        "spells" => cmd_spells(actor, world),
        "skills" => cmd_skills(actor, world),
        "score" => cmd_score(actor, world),
        "i" | "inventory" => cmd_inventory(actor, world),
        "bury" => cmd_bury(actor, args, world),
        "reclaim" => cmd_reclaim(actor, args, world),
        "resurrect" => cmd_resurrect(actor, world),

        // === Admin-only commands ===
        "setskill" => {
            if !is_admin {
                CommandResult::error("This command requires admin privileges")
            } else {
                cmd_setskill(actor, args, world)
            }
        }
        "setstat" => {
            if !is_admin {
                CommandResult::error("This command requires admin privileges")
            } else {
                cmd_setstat(actor, args, world)
            }
        }

        _ => CommandResult::error(format!("Unknown command: {}", command)),
    })
}

fn actor_room(actor: EntityId, world: &GameWorld) -> Option<RoomId> {
    world.living(actor).and_then(|l| l.room)
}

fn find_target(actor: EntityId, name: &str, world: &GameWorld) -> Option<EntityId> {
    let room = actor_room(actor, world)?;
    world.find_living_in_room(room, name)
}

// =============================================================================
// All Player Commands
// =============================================================================

fn cmd_help(is_admin: bool) -> CommandResult {
    let mut help = String::from("Available commands:\n");
    help.push_str("  look, go <room>, get <item>\n");
    help.push_str("  kill <target> - Start fighting\n");
    help.push_str("  stop - Stop fighting\n");
    help.push_str("  wield <weapon> / unwield\n");
    help.push_str("  wear <armor> / remove <armor|slot>\n");
    help.push_str("  drink <item>\n");
    help.push_str("  cast <spell> [target] / learn <spell> / spells\n");
    help.push_str("  skills, score, inventory\n");
    help.push_str("  bury [corpse], reclaim [corpse], resurrect\n");
    help.push_str("  join / leave (in a guild hall), guilds\n");

    if is_admin {
        help.push_str("\nAdmin commands:\n");
        help.push_str("  setskill <skill> <value> [target]\n");
        help.push_str("  setstat <stat> <value> [target]\n");
    }

    CommandResult::success(help)
}

fn cmd_look(actor: EntityId, world: &GameWorld) -> CommandResult {
    let Some(room) = actor_room(actor, world) else {
        return CommandResult::error("You are nowhere.");
    };
    let mut msg = if room == world.config().netherworld_room {
        String::from("You drift through a grey, silent netherworld.\n")
    } else if let Some(guild) = guild_in_room(room) {
        format!(
            "The hall of the {}.\nType 'join' to become a member, or 'leave' to resign your membership.\n",
            guild.name
        )
    } else {
        format!("Room {}\n", room)
    };
    for id in world.livings_in_room(room) {
        if id == actor {
            continue;
        }
        if let Some(living) = world.living(id) {
            msg.push_str(&format!("  {} is here.\n", living.display_name()));
        }
    }
    for id in world.corpses_in_room(room) {
        if let Some(corpse) = world.corpse(id) {
            msg.push_str(&format!("  {} lies here.\n", capitalize(&corpse.short())));
        }
    }
    for id in world.items_in_room(room) {
        msg.push_str(&format!("  A {} lies on the ground.\n", world.item_name(id)));
    }
    CommandResult::success(msg)
}

fn cmd_go(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let Some(room) = args.first().and_then(|a| a.parse::<RoomId>().ok()) else {
        return CommandResult::error("Usage: go <room>");
    };
    if actor_room(actor, world) == Some(world.config().netherworld_room) {
        return CommandResult::error("There is no way out of here but to resurrect.");
    }
    if room == world.config().netherworld_room {
        return CommandResult::error("You can't go there.");
    }
    if world.query_in_combat(actor) {
        return CommandResult::error("You are fighting for your life!");
    }
    world.move_living(actor, room);
    cmd_look(actor, world)
}

fn cmd_get(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Get what?");
    }
    let Some(room) = actor_room(actor, world) else {
        return CommandResult::error("You are nowhere.");
    };
    let Some(item) = world.find_item_in_room(room, &args.join(" ")) else {
        return CommandResult::error("You don't see that here.");
    };
    match world.pick_up(actor, item) {
        Ok(()) => CommandResult::success(format!("You pick up the {}.", world.item_name(item))),
        Err(e) => e.into(),
    }
}

fn cmd_join(actor: EntityId, world: &mut GameWorld) -> CommandResult {
    let Some(guild) = actor_room(actor, world).and_then(guild_in_room) else {
        return CommandResult::error("This is not a guild. Find a guild hall to join.");
    };
    match world.join_guild(actor, &guild.key) {
        Ok(()) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

fn cmd_leave(actor: EntityId, world: &mut GameWorld) -> CommandResult {
    let Some(guild) = actor_room(actor, world).and_then(guild_in_room) else {
        return CommandResult::error("This is not a guild. Go to a guild hall to leave.");
    };
    match world.leave_guild(actor, &guild.key) {
        Ok(()) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

fn cmd_guilds(actor: EntityId, world: &GameWorld) -> CommandResult {
    let guilds = world.guild_memberships(actor);
    if guilds.is_empty() {
        return CommandResult::success("You are not a member of any guilds.");
    }
    let mut msg = String::from("You are a member of the following guilds:\n");
    for guild in guilds {
        msg.push_str(&format!("  - {} (trains {})\n", guild.name, guild.granted_skills.join(", ")));
    }
    CommandResult::success(msg)
}

fn cmd_kill(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Kill whom?");
    }
    let name = args.join(" ");
    let Some(target) = find_target(actor, &name, world) else {
        return CommandResult::error(format!("You don't see '{}' here.", name));
    };
    if target == actor {
        return CommandResult::error("You can't attack yourself.");
    }

    let target_name = world.living(target).map(|l| l.short.clone()).unwrap_or_default();
    if world.start_combat(actor, target) {
        CommandResult::success(format!("You attack {}!", target_name))
    } else if world.query_attacker(actor) == Some(target) {
        CommandResult::error(format!("You are already fighting {}.", target_name))
    } else {
        CommandResult::error(format!("You can't attack {}.", target_name))
    }
}

fn cmd_stop(actor: EntityId, world: &mut GameWorld) -> CommandResult {
    if !world.query_in_combat(actor) {
        return CommandResult::error("You are not fighting anyone.");
    }
    world.stop_combat(actor);
    CommandResult::success("You stop fighting.")
}

fn carried(actor: EntityId, args: &[&str], world: &GameWorld, verb: &str) -> Result<ItemId, CommandResult> {
    if args.is_empty() {
        return Err(CommandResult::error(format!("{} what?", capitalize(verb))));
    }
    let name = args.join(" ");
    world
        .find_carried_item(actor, &name)
        .ok_or_else(|| CommandResult::error(format!("You don't have '{}'.", name)))
}

fn cmd_wield(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let item = match carried(actor, args, world, "wield") {
        Ok(item) => item,
        Err(result) => return result,
    };
    match world.wield(actor, item) {
        Ok(()) => CommandResult::success(format!("You wield the {}.", world.item_name(item))),
        Err(e) => e.into(),
    }
}

fn cmd_unwield(actor: EntityId, world: &mut GameWorld) -> CommandResult {
    match world.unwield(actor) {
        Ok(item) => CommandResult::success(format!("You stop wielding the {}.", world.item_name(item))),
        Err(e) => e.into(),
    }
}

fn cmd_wear(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let item = match carried(actor, args, world, "wear") {
        Ok(item) => item,
        Err(result) => return result,
    };
    match world.wear(actor, item) {
        Ok(()) => CommandResult::success(format!("You wear the {}.", world.item_name(item))),
        Err(e) => e.into(),
    }
}

fn cmd_remove(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Remove what?");
    }
    let name = args.join(" ");
    // An item name wins over a slot name
    let slot = world
        .find_carried_item(actor, &name)
        .and_then(|item| world.worn_slot(actor, item))
        .unwrap_or(name);
    match world.remove_armor(actor, &slot) {
        Ok(item) => CommandResult::success(format!("You remove the {}.", world.item_name(item))),
        Err(e) => e.into(),
    }
}

fn cmd_drink(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let item = match carried(actor, args, world, "drink") {
        Ok(item) => item,
        Err(result) => return result,
    };
    match world.drink(actor, item) {
        Ok(level) if level >= 80 => CommandResult::success("The room is spinning."),
        Ok(level) if level >= 40 => CommandResult::success("You feel quite drunk."),
        Ok(_) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

/// Longest spell name the input starts with, and whatever follows it
fn match_spell<'a>(input: &'a str, spells: &[SpellDef]) -> Option<(SpellDef, &'a str)> {
    let lower = input.to_lowercase();
    spells
        .iter()
        .filter(|spell| {
            lower == spell.name || lower.starts_with(&format!("{} ", spell.name))
        })
        .max_by_key(|spell| spell.name.len())
        .map(|spell| {
            let rest = input.get(spell.name.len()..).unwrap_or("").trim();
            (spell.clone(), rest)
        })
}

fn cmd_cast(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Usage: cast <spell name> [target]");
    }
    let known: Vec<SpellDef> = world
        .living(actor)
        .map(|l| l.known_spells.iter().filter_map(|id| get_spell_by_id(*id)).collect())
        .unwrap_or_default();
    if known.is_empty() {
        return CommandResult::error("You don't know any spells.");
    }

    let input = args.join(" ");
    let Some((spell, rest)) = match_spell(&input, &known) else {
        return CommandResult::error(format!("You don't know a spell called '{}'.", input));
    };
    let target = if rest.is_empty() {
        None
    } else {
        match find_target(actor, rest, world) {
            Some(target) => Some(target),
            None => return CommandResult::error(format!("You don't see '{}' here.", rest)),
        }
    };

    match world.cast(actor, spell.id, target) {
        Ok(CastOutcome::Fizzled) => CommandResult {
            success: false,
            message: String::new(),
        },
        Ok(_) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

fn cmd_learn(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Learn which spell?");
    }
    let input = args.join(" ");
    let Some((spell, _)) = match_spell(&input, &get_spell_definitions()) else {
        return CommandResult::error(format!("There is no spell called '{}'.", input));
    };
    match world.learn_spell(actor, spell.id) {
        Ok(true) => CommandResult::done(),
        Ok(false) => CommandResult::error(format!("You already know {}.", spell.name)),
        Err(e) => e.into(),
    }
}

fn cmd_spells(actor: EntityId, world: &GameWorld) -> CommandResult {
    let Some(living) = world.living(actor) else {
        return CommandResult::error("You are not in the world");
    };
    if living.known_spells.is_empty() {
        return CommandResult::success("You don't know any spells.");
    }
    let mut msg = String::from("Known spells:\n");
    for spell in living.known_spells.iter().filter_map(|id| get_spell_by_id(*id)) {
        msg.push_str(&format!(
            "  {} ({}, {} mana, min skill {})\n",
            spell.name, spell.school, spell.mana_cost, spell.min_skill
        ));
    }
    CommandResult::success(msg)
}

fn cmd_skills(actor: EntityId, world: &GameWorld) -> CommandResult {
    let Some(living) = world.living(actor) else {
        return CommandResult::error("You are not in the world");
    };
    let mut skills: Vec<(&String, &u32)> = living.skills().iter().filter(|(_, v)| **v > 0).collect();
    if skills.is_empty() {
        return CommandResult::success("You have no trained skills.");
    }
    skills.sort();
    let mut msg = String::from("Skills:\n");
    for (name, value) in skills {
        msg.push_str(&format!("  {:<14} {}\n", name, value));
    }
    CommandResult::success(msg)
}

fn cmd_score(actor: EntityId, world: &GameWorld) -> CommandResult {
    let Some(living) = world.living(actor) else {
        return CommandResult::error("You are not in the world");
    };
    let mut msg = format!(
        "{}\n  HP: {}/{}  Mana: {}/{}  Intoxication: {}\n",
        living.display_name(),
        living.hp(),
        living.max_hp(),
        living.mana(),
        living.max_mana(),
        living.intoxication()
    );
    let stats: Vec<String> = Stat::ALL
        .iter()
        .map(|stat| format!("{} {}", &stat.name()[..3], living.stat(*stat)))
        .collect();
    msg.push_str(&format!("  {}\n", stats.join("  ")));
    if let Some(data) = living.player_data() {
        let guilds = if data.guilds.is_empty() {
            "none".to_string()
        } else {
            data.guilds.join(", ")
        };
        msg.push_str(&format!("  XP {}  Guilds: {}\n", data.xp, guilds));
    }
    msg.push_str(&format!("  Armor: {}", world.total_armor(actor)));
    CommandResult::success(msg)
}

fn cmd_inventory(actor: EntityId, world: &GameWorld) -> CommandResult {
    let Some(living) = world.living(actor) else {
        return CommandResult::error("You are not in the world");
    };
    if living.inventory.is_empty() {
        return CommandResult::success("You are carrying nothing.");
    }
    let mut msg = String::from("You are carrying:\n");
    for item in &living.inventory {
        let mut line = format!("  {}", world.item_name(*item));
        if living.wielded == Some(*item) {
            line.push_str(" (wielded)");
        } else if let Some(slot) = world.worn_slot(actor, *item) {
            line.push_str(&format!(" (worn on {})", slot));
        }
        msg.push_str(&line);
        msg.push('\n');
    }
    CommandResult::success(msg)
}

fn find_corpse(actor: EntityId, args: &[&str], world: &GameWorld) -> Result<EntityId, CommandResult> {
    let room = actor_room(actor, world).ok_or_else(|| CommandResult::error("You are nowhere."))?;
    let word = if args.is_empty() {
        // Prefer the actor's own corpse
        let own = world.living(actor).map(|l| format!("{} corpse", l.name)).unwrap_or_default();
        if world.find_corpse_in_room(room, &own).is_some() {
            own
        } else {
            "corpse".to_string()
        }
    } else {
        args.join(" ")
    };
    world
        .find_corpse_in_room(room, &word)
        .ok_or_else(|| CommandResult::error("You don't see that corpse here."))
}

fn cmd_bury(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let corpse = match find_corpse(actor, args, world) {
        Ok(corpse) => corpse,
        Err(result) => return result,
    };
    match world.bury_corpse(actor, corpse) {
        Ok(()) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

fn cmd_reclaim(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    let corpse = match find_corpse(actor, args, world) {
        Ok(corpse) => corpse,
        Err(result) => return result,
    };
    match world.reclaim_corpse(actor, corpse) {
        Ok(items) if items.is_empty() => CommandResult::success("The corpse is empty."),
        Ok(_) => CommandResult::done(),
        Err(e) => e.into(),
    }
}

fn cmd_resurrect(actor: EntityId, world: &mut GameWorld) -> CommandResult {
    match world.resurrect(actor) {
        Ok(()) => CommandResult::done(),
        Err(EngineError::InvalidTarget) => CommandResult::error("You are not dead."),
        Err(e) => e.into(),
    }
}

// =============================================================================
// Admin Commands
// =============================================================================

/// Optional trailing target name, defaulting to the actor
fn admin_target(actor: EntityId, args: &[&str], world: &GameWorld) -> Result<EntityId, CommandResult> {
    if args.is_empty() {
        return Ok(actor);
    }
    let name = args.join(" ");
    find_target(actor, &name, world).ok_or_else(|| CommandResult::error(format!("Target '{}' not found", name)))
}

fn cmd_setskill(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.len() < 2 {
        return CommandResult::error("Usage: setskill <skill> <value> [target]");
    }
    let skill = args[0].to_lowercase();
    let value: u32 = match args[1].parse() {
        Ok(v) => v,
        Err(_) => return CommandResult::error("Invalid skill value"),
    };
    let target = match admin_target(actor, &args[2..], world) {
        Ok(target) => target,
        Err(result) => return result,
    };

    let old = world.query_skill(target, &skill);
    world.set_skill(target, &skill, value);
    CommandResult::success(format!("{} changed from {} to {}", skill, old, value))
}

fn cmd_setstat(actor: EntityId, args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.len() < 2 {
        return CommandResult::error("Usage: setstat <stat> <value> [target]");
    }
    let Some(stat) = Stat::parse(args[0]) else {
        return CommandResult::error(format!("Unknown stat: {}", args[0]));
    };
    let value: u32 = match args[1].parse() {
        Ok(v) if v >= 1 => v,
        _ => return CommandResult::error("Stat must be a positive number"),
    };
    let target = match admin_target(actor, &args[2..], world) {
        Ok(target) => target,
        Err(result) => return result,
    };

    world.set_stat(target, stat, value);
    let living = world.living(target);
    CommandResult::success(format!(
        "{} set to {}. HP={}/{}, Mana={}/{}",
        stat.name(),
        value,
        living.map_or(0, |l| l.hp()),
        living.map_or(0, |l| l.max_hp()),
        living.map_or(0, |l| l.mana()),
        living.map_or(0, |l| l.max_mana()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tests::test_world;
    use mud_shared::find_monster_template;

    fn run(world: &mut GameWorld, actor: EntityId, line: &str) -> CommandResult {
        parse_and_execute(line, actor, false, world).unwrap()
    }

    #[test]
    fn test_blank_and_unknown() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        assert!(parse_and_execute("   ", hero, false, &mut world).is_none());
        assert!(!run(&mut world, hero, "dance").success);
        assert!(!run(&mut world, 999, "score").success);
    }

    #[test]
    fn test_kill_and_stop() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 2);
        let rat = world.spawn_monster(&find_monster_template("rat").unwrap(), 2);

        assert!(!run(&mut world, hero, "kill goblin").success);
        assert!(!run(&mut world, hero, "kill hero").success);
        assert!(run(&mut world, hero, "kill rat").success);
        assert_eq!(world.query_attacker(hero), Some(rat));
        assert!(!run(&mut world, hero, "kill rat").success);

        assert!(run(&mut world, hero, "stop").success);
        assert!(!world.query_in_combat(hero));
        assert!(!run(&mut world, hero, "stop").success);
    }

    #[test]
    fn test_equipment_commands() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        let sword = world.give_item(hero, 5).unwrap();
        let helm = world.give_item(hero, 21).unwrap();
        world.give_item(hero, 1).unwrap();

        assert!(run(&mut world, hero, "wield sword").success);
        assert_eq!(world.living(hero).unwrap().wielded, Some(sword));
        let refused = run(&mut world, hero, "wield ale");
        assert_eq!(refused, CommandResult::error("That is not a weapon."));

        assert!(run(&mut world, hero, "wear helm").success);
        assert!(run(&mut world, hero, "remove iron helm").success);
        assert!(run(&mut world, hero, "wear helm").success);
        assert!(run(&mut world, hero, "remove head").success);
        assert_eq!(world.worn_slot(hero, helm), None);
        assert!(!run(&mut world, hero, "remove head").success);

        assert!(run(&mut world, hero, "unwield").success);
        assert!(run(&mut world, hero, "drink ale").success);
        assert_eq!(world.query_intoxication(hero), 15);
        assert!(!run(&mut world, hero, "drink ale").success);
    }

    #[test]
    fn test_learn_and_cast() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 2);
        let rat = world.spawn_monster(&find_monster_template("rat").unwrap(), 2);

        assert!(!run(&mut world, hero, "cast magic missile rat").success);
        assert_eq!(
            run(&mut world, hero, "learn magic missile"),
            CommandResult::error("You can't train evocation.")
        );
        world.living_mut(hero).unwrap().allowed_skills.insert("evocation".into());
        assert!(run(&mut world, hero, "learn Magic Missile").success);

        assert!(!run(&mut world, hero, "cast fireball rat").success);
        assert!(!run(&mut world, hero, "cast magic missile troll").success);

        // failed advancement
        world.dice.push_rolls(&[99]);
        let result = run(&mut world, hero, "cast magic missile rat");
        assert_eq!(result, CommandResult::done());
        assert_eq!(world.query_hp(rat), Some(11));
        assert!(world
            .drain_events()
            .contains(&mud_shared::GameEvent::message(hero, "The magic missile deals 4 damage!")));
    }

    #[test]
    fn test_match_spell() {
        let spells = get_spell_definitions();
        let (spell, rest) = match_spell("Magic Missile big rat", &spells).unwrap();
        assert_eq!(spell.id, 1);
        assert_eq!(rest, "big rat");
        assert!(match_spell("magic", &spells).is_none());
        assert_eq!(match_spell("heal", &spells).unwrap().1, "");
    }

    #[test]
    fn test_death_commands() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 3);
        world.give_item(hero, 5).unwrap();

        assert_eq!(run(&mut world, hero, "resurrect"), CommandResult::error("You are not dead."));
        world.die(hero, None);
        assert!(!run(&mut world, hero, "reclaim").success);
        assert!(run(&mut world, hero, "resurrect").success);
        world.move_living(hero, 3);

        assert_eq!(run(&mut world, hero, "reclaim"), CommandResult::done());
        assert!(world.living(hero).unwrap().wielded.is_none());
        assert!(run(&mut world, hero, "bury corpse").success);
        assert!(world.corpses_in_room(3).is_empty());
    }

    #[test]
    fn test_admin_gate() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);

        assert!(!run(&mut world, hero, "setskill sword 10").success);
        let result = parse_and_execute("setskill sword 10", hero, true, &mut world).unwrap();
        assert!(result.success);
        assert_eq!(world.query_skill(hero, "sword"), 10);

        let result = parse_and_execute("setstat con 10", hero, true, &mut world).unwrap();
        assert!(result.success);
        assert_eq!(world.query_max_hp(hero), Some(60));
        assert!(!parse_and_execute("setstat luck 3", hero, true, &mut world).unwrap().success);
    }

    #[test]
    fn test_score_and_skills() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        assert_eq!(run(&mut world, hero, "skills"), CommandResult::success("You have no trained skills."));
        world.set_skill(hero, "dodge", 3);
        assert!(run(&mut world, hero, "skills").message.contains("dodge"));
        let score = run(&mut world, hero, "score").message;
        assert!(score.contains("HP: 15/15"));
        assert!(score.contains("XP 0  Guilds: none"));
    }

    #[test]
    fn test_look_go_and_get() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);
        world.spawn_monster(&find_monster_template("rat").unwrap(), 2);
        world.clone_item(6, crate::entities::ItemLocation::Room(2)).unwrap();

        assert!(!run(&mut world, hero, "go north").success);
        assert!(!run(&mut world, hero, "go 0").success);
        let look = run(&mut world, hero, "go 2");
        assert!(look.success);
        assert!(look.message.contains("A mangy rat is here."));
        assert!(look.message.contains("rusty dagger lies on the ground"));

        assert_eq!(run(&mut world, hero, "get dagger").message, "You pick up the rusty dagger.");
        assert!(!run(&mut world, hero, "get dagger").success);
        assert!(run(&mut world, hero, "wield dagger").success);
    }

    #[test]
    fn test_guild_commands() {
        let mut world = test_world();
        let hero = world.spawn_player("Hero", 1);

        assert_eq!(
            run(&mut world, hero, "join"),
            CommandResult::error("This is not a guild. Find a guild hall to join.")
        );
        assert_eq!(run(&mut world, hero, "guilds").message, "You are not a member of any guilds.");

        let look = run(&mut world, hero, "go 7");
        assert!(look.message.contains("The hall of the Mages Guild."));
        assert_eq!(run(&mut world, hero, "join"), CommandResult::done());
        assert_eq!(
            run(&mut world, hero, "join"),
            CommandResult::error("You are already a member of the Mages Guild.")
        );
        assert!(run(&mut world, hero, "guilds").message.contains("Mages Guild (trains evocation"));

        run(&mut world, hero, "go 8");
        assert_eq!(
            run(&mut world, hero, "join"),
            CommandResult::error("Members of the Mages Guild cannot join the Healers Guild.")
        );
        assert_eq!(
            run(&mut world, hero, "leave"),
            CommandResult::error("You are not a member of the Healers Guild.")
        );

        run(&mut world, hero, "go 7");
        assert_eq!(run(&mut world, hero, "leave"), CommandResult::done());
        assert!(run(&mut world, hero, "score").message.contains("Guilds: none"));
    }
}
