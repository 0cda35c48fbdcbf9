//! Error type for the companion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The host app has no signed-in user.
  #[error("no authenticated user")]
  NotAuthenticated,

  /// Rejected input, such as an out-of-range mood or empty journal text.
  #[error(transparent)]
  Invalid(#[from] solace_core::Error),

  #[error("could not build remote store client: {0}")]
  Store(#[from] solace_store_firestore::Error),

  #[error("could not build oracle client: {0}")]
  Oracle(#[from] solace_oracle::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
