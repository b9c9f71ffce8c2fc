//! [`Source`] is the runtime choice between the two backends.

use roster_core::{
  directory::{PeopleDocument, PostRef},
  person::PostDetail,
  source::DataSource,
};
use serde::Deserialize;

use crate::{
  Result,
  remote::{RemoteConfig, RemoteSource},
  static_source::{Location, StaticSource},
};

/// Which backend to use, as written in configuration.
///
/// ```toml
/// [source]
/// kind = "static"
/// location = "https://example.org/"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
  Static { location: String },
  Remote(RemoteConfig),
}

impl Default for SourceConfig {
  fn default() -> Self { Self::Static { location: ".".to_owned() } }
}

/// Either backend behind one [`DataSource`] impl.
pub enum Source {
  Static(StaticSource),
  Remote(RemoteSource),
}

impl Source {
  pub fn from_config(config: &SourceConfig) -> Result<Self> {
    Ok(match config {
      SourceConfig::Static { location } => {
        Self::Static(StaticSource::new(Location::parse(location)?)?)
      }
      SourceConfig::Remote(remote) => Self::Remote(RemoteSource::new(remote.clone())?),
    })
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Static(_) => "static",
      Self::Remote(_) => "remote",
    }
  }
}

impl DataSource for Source {
  type Error = crate::Error;

  async fn establish_session(&self) -> Result<()> {
    match self {
      Self::Static(s) => s.establish_session().await,
      Self::Remote(r) => r.establish_session().await,
    }
  }

  async fn fetch_people(&self) -> Result<PeopleDocument> {
    match self {
      Self::Static(s) => s.fetch_people().await,
      Self::Remote(r) => r.fetch_people().await,
    }
  }

  async fn fetch_post(&self, post: &PostRef) -> Result<Option<PostDetail>> {
    match self {
      Self::Static(s) => s.fetch_post(post).await,
      Self::Remote(r) => r.fetch_post(post).await,
    }
  }
}
