//! Whole-aggregate persistence

use std::path::{Path, PathBuf};

use swiss_core::{StateError, Tournament, TournamentError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize tournament: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves the full tournament aggregate as one value.
pub trait TournamentStore {
    fn load(&self) -> Result<Tournament, StoreError>;
    fn save(&self, tournament: &Tournament) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TournamentStore for JsonFileStore {
    fn load(&self) -> Result<Tournament, StoreError> {
        if !self.path.exists() {
            return Err(TournamentError::from(StateError::NoActiveTournament).into());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let tournament = serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "tournament loaded");
        Ok(tournament)
    }

    fn save(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(tournament)?;
        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        debug!(path = %self.path.display(), round = tournament.current_round, "tournament saved");
        Ok(())
    }
}
