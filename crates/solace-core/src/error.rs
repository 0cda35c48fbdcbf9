//! Error types for `solace-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("mood must be between 1 and 5, got {0}")]
  MoodOutOfRange(u8),

  #[error("journal content must not be empty")]
  EmptyContent,

  #[error("{0} did not serialise to a document object")]
  NotADocument(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
