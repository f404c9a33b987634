//! MUD Server
//!
//! Runs the world's tick loop and drives a single local player from stdin.
//! Events addressed to that player are printed; everything else is logged.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use mud_shared::{get_monster_templates, GameEvent};
use mud_server::commands;
use mud_server::entities::EntityId;
use mud_server::persistence;
use mud_server::{EngineConfig, GameWorld};

/// Name used when none is given on the command line
const DEFAULT_PLAYER: &str = "Hero";

/// First room populated by the built-in monster templates
const FIRST_MONSTER_ROOM: u32 = 2;

/// Item templates handed to a new character
const STARTER_ITEMS: [u32; 3] = [6, 20, 1];

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting MUD server...");

    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };
    info!("Tick length: {} ms", config.tick_millis);

    let persistence = match persistence::init(config.data_dir.clone()).await {
        Ok(p) => {
            info!("Persistence layer initialized");
            Some(p)
        }
        Err(e) => {
            error!("Failed to initialize persistence: {}", e);
            error!("Server will run without persistence (no save/load)");
            None
        }
    };

    let mut world = GameWorld::new(config.clone());
    if let Some((handle, _)) = &persistence {
        world.set_persistence(handle.clone());
    }

    for (room, template) in (FIRST_MONSTER_ROOM..).zip(get_monster_templates()) {
        world.spawn_monster(&template, room);
    }

    let name = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_PLAYER.to_string());
    let saved = match &persistence {
        Some((handle, _)) => handle.load_player(&name).await,
        None => None,
    };
    let player = match saved {
        Some(save) => world.spawn_player_from_save(&save),
        None => {
            let id = world.spawn_player(&name, config.respawn_room);
            for def_id in STARTER_ITEMS {
                if world.give_item(id, def_id).is_none() {
                    warn!("Unknown starter item template {}", def_id);
                }
            }
            id
        }
    };
    let is_admin = std::env::var_os("MUD_ADMIN").is_some();

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_millis.max(1)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticks_since_save: u64 = 0;

    info!("Server started successfully! Type 'help' for commands, 'quit' to leave.");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                world.pulse();

                ticks_since_save += 1;
                if ticks_since_save >= config.save_interval_ticks {
                    save_all_players(&mut world);
                    ticks_since_save = 0;
                }
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.eq_ignore_ascii_case("quit") {
                        break;
                    }
                    if let Some(result) = commands::parse_and_execute(line, player, is_admin, &mut world) {
                        if !result.message.is_empty() {
                            println!("{}", result.message.trim_end());
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }

        let events = world.drain_events();
        deliver(&world, player, events);
    }

    info!("Shutting down...");
    save_all_players(&mut world);
    let events = world.drain_events();
    deliver(&world, player, events);

    if let Some((handle, task)) = persistence {
        handle.shutdown().await;
        if let Err(e) = task.await {
            error!("Persistence task failed: {}", e);
        }
    }
}

fn save_all_players(world: &mut GameWorld) {
    let players = world.players();
    let saved = players.iter().filter(|id| world.save_player(**id)).count();
    debug!("Periodic save queued for {}/{} players", saved, players.len());
}

/// Print events the local player would see and log the rest
fn deliver(world: &GameWorld, player: EntityId, events: Vec<GameEvent>) {
    let room = world.living(player).and_then(|l| l.room);
    for event in events {
        match event {
            GameEvent::Message { to, text } if to == player => println!("{}", text),
            GameEvent::RoomMessage { room: r, text, exclude }
                if Some(r) == room && !exclude.contains(&player) =>
            {
                println!("{}", text)
            }
            other => info!("{:?}", other),
        }
    }
}
