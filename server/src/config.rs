//! Engine configuration loaded from an optional TOML file.

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use mud_shared::{DEFAULT_TICK_MILLIS, NETHERWORLD_ROOM, RESPAWN_ROOM};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "MUD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for the tick loop, death handling and persistence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock pacing of one logical tick (binary only)
    pub tick_millis: u64,
    /// Logical ticks between heartbeats of a scheduled living
    pub heartbeat_interval: u64,
    /// Logical ticks before a corpse decays
    pub corpse_decay_ticks: u64,
    /// Logical ticks between periodic player saves
    pub save_interval_ticks: u64,
    /// Fixed RNG seed; random if unset
    pub rng_seed: Option<u64>,
    /// Directory for player save files
    pub data_dir: PathBuf,
    pub netherworld_room: u32,
    pub respawn_room: u32,
    /// Baseline HP regenerated per tick for new livings
    pub regen_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_millis: DEFAULT_TICK_MILLIS,
            heartbeat_interval: 1,
            corpse_decay_ticks: 150,
            save_interval_ticks: 30,
            rng_seed: None,
            data_dir: PathBuf::from("data/players"),
            netherworld_room: NETHERWORLD_ROOM,
            respawn_room: RESPAWN_ROOM,
            regen_rate: 1,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Load from the file named by `MUD_CONFIG`, or fall back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                info!("{} not set, using default config", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }
}
