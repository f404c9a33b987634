//! Combat and progression engine for a persistent text world.
//!
//! The world is driven by one cooperative tick loop: every scheduled living
//! fights or regenerates on its heartbeat, and every change is reported as a
//! [`mud_shared::GameEvent`] for a transport collaborator to deliver.

pub mod config;
pub mod error;
pub mod dice;
pub mod scheduler;
pub mod entities;
pub mod world;
pub mod combat;
pub mod progression;
pub mod regen;
pub mod equipment;
pub mod death;
pub mod spells;
pub mod guilds;
pub mod persistence;
pub mod commands;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use world::GameWorld;
