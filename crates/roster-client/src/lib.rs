//! Data source adapters for Roster.
//!
//! Two backing mechanisms satisfy [`roster_core::source::DataSource`]:
//!
//! - [`StaticSource`]: a bundled static document (`data/index.json` plus one
//!   irregularly named file per post), served over HTTP or read from a local
//!   directory.
//! - [`RemoteSource`]: a hosted, PostgREST-style queryable service with
//!   row-level security and anonymous sign-in.
//!
//! [`Catalog`] wraps either one with the load-once directory cache.

pub mod catalog;
pub mod error;
pub mod raw;
pub mod remote;
pub mod source;
pub mod static_source;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use remote::{RemoteConfig, RemoteSource, Session};
pub use source::{Source, SourceConfig};
pub use static_source::{Location, StaticSource};

use std::time::Duration;

/// The shared HTTP client configuration.
pub(crate) fn http_client() -> Result<reqwest::Client> {
  Ok(
    reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?,
  )
}
