//! Error type for `solace-oracle`.
//!
//! None of these reach callers of [`Oracle`](crate::Oracle); they are logged
//! before the fallback answers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no oracle api key is configured")]
  NotConfigured,

  #[error("settings error: {0}")]
  Settings(#[from] solace_core::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("oracle responded {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("oracle returned no text")]
  EmptyResponse,

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("unusable sentiment response: {0}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
