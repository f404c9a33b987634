//! Persistence layer for player saves.
//!
//! The tick loop never blocks on I/O: saves are queued on a channel and
//! written by a background task.

mod store;

pub use store::{PersistenceError, PlayerStore};

use std::path::PathBuf;

use log::{error, info, warn};
use tokio::sync::{mpsc, oneshot};

use mud_shared::PlayerSave;

/// Commands sent to the persistence background task
#[derive(Debug)]
pub enum PersistenceCommand {
    /// Write a player's state to the store
    SavePlayer(PlayerSave),
    /// Load a player by name (response sent via oneshot channel)
    LoadPlayer {
        name: String,
        response: oneshot::Sender<Option<PlayerSave>>,
    },
    /// Shutdown the persistence task once queued saves are written
    Shutdown,
}

/// Handle for sending commands to the persistence task
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: mpsc::Sender<PersistenceCommand>,
}

impl PersistenceHandle {
    /// Save player state (fire and forget - non-blocking)
    pub fn save_player(&self, save: PlayerSave) {
        let name = save.name.clone();
        if let Err(e) = self.sender.try_send(PersistenceCommand::SavePlayer(save)) {
            warn!("Dropped save for '{}': {}", name, e);
        }
    }

    /// Load a player's saved state, if any
    pub async fn load_player(&self, name: &str) -> Option<PlayerSave> {
        let (tx, rx) = oneshot::channel();
        let command = PersistenceCommand::LoadPlayer {
            name: name.to_string(),
            response: tx,
        };
        if self.sender.send(command).await.is_err() {
            return None;
        }
        rx.await.ok().flatten()
    }

    /// Shutdown the persistence task
    pub async fn shutdown(&self) {
        let _ = self.sender.send(PersistenceCommand::Shutdown).await;
    }

    /// Handle whose commands land on a plain channel instead of a task
    #[cfg(test)]
    pub(crate) fn detached(capacity: usize) -> (Self, mpsc::Receiver<PersistenceCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { sender: tx }, rx)
    }
}

/// Initialize the persistence system and spawn the background task.
/// Returns a handle for sending commands and the task's join handle.
pub async fn init(
    data_dir: impl Into<PathBuf>,
) -> Result<(PersistenceHandle, tokio::task::JoinHandle<()>), PersistenceError> {
    let store = PlayerStore::open(data_dir).await?;
    info!("Player store ready at {}", store.dir().display());

    let (tx, rx) = mpsc::channel(256);
    let task = tokio::spawn(persistence_task(store, rx));
    info!("Persistence background task started");

    Ok((PersistenceHandle { sender: tx }, task))
}

/// Background task that handles all persistence operations
async fn persistence_task(store: PlayerStore, mut rx: mpsc::Receiver<PersistenceCommand>) {
    info!("Persistence task running");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            PersistenceCommand::SavePlayer(save) => {
                if let Err(e) = store.save(&save).await {
                    error!("Failed to save player '{}': {}", save.name, e);
                }
            }

            PersistenceCommand::LoadPlayer { name, response } => {
                let result = match store.load(&name).await {
                    Ok(Some(save)) => {
                        info!("Loaded player '{}'", name);
                        Some(save)
                    }
                    Ok(None) => {
                        info!("No saved data for player '{}'", name);
                        None
                    }
                    Err(e) => {
                        error!("Failed to load player '{}': {}", name, e);
                        None
                    }
                };
                let _ = response.send(result);
            }

            PersistenceCommand::Shutdown => {
                info!("Persistence task shutting down");
                break;
            }
        }
    }

    info!("Persistence task stopped");
}
