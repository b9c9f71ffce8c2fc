//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backing store could not be reached or answered with a failure.
  #[error("data unavailable: {0}")]
  DataUnavailable(String),

  /// No readable detail record exists for the post. Covers posts that exist
  /// but are hidden by the approval gate.
  #[error("post not found: {0}")]
  PostNotFound(String),

  /// The persisted preference value could not be decoded.
  #[error("preference store corrupt: {0}")]
  PreferenceStoreCorrupt(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
