//! Error type for `solace-store-firestore`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("remote store is not configured")]
  NotConfigured,

  #[error("core error: {0}")]
  Core(#[from] solace_core::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("remote store responded {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("malformed document: {0}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
