use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "flowboard.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse flowboard.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize flowboard.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Read `flowboard.toml` from a board directory. A missing file yields the
/// defaults.
pub fn read_config(board_dir: &Path) -> Result<Config, ConfigError> {
    let path = board_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write the config with every field spelled out
pub fn write_config(board_dir: &Path, config: &Config) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    fs::write(board_dir.join(CONFIG_FILE), text)?;
    Ok(())
}
