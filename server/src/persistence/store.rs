//! JSON file store, one file per lowercase player name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use mud_shared::PlayerSave;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed save {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid player name '{0}'")]
    InvalidName(String),
}

pub struct PlayerStore {
    dir: PathBuf,
}

impl PlayerStore {
    /// Open the store, creating its directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistenceError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        let name = name.to_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PersistenceError::InvalidName(name));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    /// Write a save, replacing any previous one atomically
    pub async fn save(&self, save: &PlayerSave) -> Result<(), PersistenceError> {
        let path = self.path_for(&save.name)?;
        let json = serde_json::to_vec_pretty(save)
            .map_err(|source| PersistenceError::Json { path: path.clone(), source })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| PersistenceError::Io { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| PersistenceError::Io { path: path.clone(), source })?;
        Ok(())
    }

    /// Load a save. A missing file is `Ok(None)`.
    pub async fn load(&self, name: &str) -> Result<Option<PlayerSave>, PersistenceError> {
        let path = self.path_for(name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| PersistenceError::Json { path, source })
    }
}
