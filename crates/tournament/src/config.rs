//! TOML configuration loading

use std::path::{Path, PathBuf};

use swiss_core::{TournamentConfig, ValidationError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Parse and validate a configuration document.
pub fn parse_config(contents: &str) -> Result<TournamentConfig, ConfigError> {
    let config: TournamentConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<inline>"),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<TournamentConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(TournamentConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
