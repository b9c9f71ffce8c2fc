//! Error type for `roster-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} returned {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A document the source cannot work without is absent.
  #[error("missing document: {0}")]
  Missing(String),

  #[error("invalid source location {location:?}: {reason}")]
  InvalidLocation { location: String, reason: String },

  #[error("anonymous sign-in failed: {0}")]
  Auth(String),
}

impl From<Error> for roster_core::Error {
  fn from(e: Error) -> Self { roster_core::Error::DataUnavailable(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
