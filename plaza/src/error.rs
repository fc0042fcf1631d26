use std::io;

use thiserror::Error;

/// Errors raised while loading, merging or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
