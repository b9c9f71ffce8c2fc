//! [`StaticSource`] is the bundled static document backend.
//!
//! Layout under the root:
//!
//! | Path | Content |
//! |------|---------|
//! | `data/index.json` | People collection plus declared regions and universities |
//! | `data/posts/<file>` | One detail document per post; `<file>` comes from the index |
//!
//! Post files are not named after post ids, so a post can only
//! be opened through the locator recorded in the index.

use std::path::PathBuf;

use reqwest::{StatusCode, Url, header};
use roster_core::{
  directory::{PeopleDocument, PostRef},
  person::PostDetail,
  source::DataSource,
};

use crate::{
  Error, Result, http_client,
  raw::{RawIndex, RawPostDetail},
};

const INDEX_PATH: &str = "data/index.json";
const POSTS_DIR: &str = "data/posts";

// ─── Location ────────────────────────────────────────────────────────────────

/// Where the static documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  /// Base URL; always ends with `/` so relative joins stay underneath it.
  Http(Url),
  Dir(PathBuf),
}

impl Location {
  /// `http://` and `https://` prefixes select HTTP; anything else is a
  /// directory path.
  pub fn parse(raw: &str) -> Result<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return Err(Error::InvalidLocation {
        location: raw.to_owned(),
        reason:   "empty".into(),
      });
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
      let mut url = Url::parse(raw).map_err(|e| Error::InvalidLocation {
        location: raw.to_owned(),
        reason:   e.to_string(),
      })?;
      if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
      }
      return Ok(Self::Http(url));
    }
    Ok(Self::Dir(PathBuf::from(raw)))
  }
}

/// Post file names must stay inside the posts directory.
fn is_safe_file_name(file: &str) -> bool {
  !file.is_empty() && !file.contains(['/', '\\']) && file != "." && file != ".."
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Reads the directory and post details from static JSON documents.
///
/// Cloning is cheap; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct StaticSource {
  location: Location,
  client:   reqwest::Client,
}

impl StaticSource {
  pub fn new(location: Location) -> Result<Self> {
    Ok(Self { location, client: http_client()? })
  }

  /// Read the document at `rel`; `None` when it does not exist.
  async fn read(&self, rel: &str) -> Result<Option<Vec<u8>>> {
    match &self.location {
      Location::Http(base) => {
        let url = base.join(rel).map_err(|e| Error::InvalidLocation {
          location: rel.to_owned(),
          reason:   e.to_string(),
        })?;
        tracing::debug!(%url, "fetching static document");

        let resp = self
          .client
          .get(url.clone())
          .header(header::CACHE_CONTROL, "no-store")
          .send()
          .await?;
        match resp.status() {
          StatusCode::NOT_FOUND => Ok(None),
          status if status.is_success() => Ok(Some(resp.bytes().await?.to_vec())),
          status => Err(Error::Status { url: url.to_string(), status }),
        }
      }
      Location::Dir(root) => {
        let path = root.join(rel);
        tracing::debug!(path = %path.display(), "reading static document");
        match tokio::fs::read(&path).await {
          Ok(bytes) => Ok(Some(bytes)),
          Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
          Err(e) => Err(e.into()),
        }
      }
    }
  }
}

impl DataSource for StaticSource {
  type Error = Error;

  async fn establish_session(&self) -> Result<()> { Ok(()) }

  async fn fetch_people(&self) -> Result<PeopleDocument> {
    let bytes = self
      .read(INDEX_PATH)
      .await?
      .ok_or_else(|| Error::Missing(INDEX_PATH.to_owned()))?;
    let index: RawIndex = serde_json::from_slice(&bytes)?;
    Ok(index.into_document())
  }

  async fn fetch_post(&self, post: &PostRef) -> Result<Option<PostDetail>> {
    let Some(file) = post.file.as_deref() else {
      return Ok(None);
    };
    if !is_safe_file_name(file) {
      tracing::warn!(post_id = %post.id, file, "refusing unsafe post file name");
      return Ok(None);
    }

    let Some(bytes) = self.read(&format!("{POSTS_DIR}/{file}")).await? else {
      return Ok(None);
    };
    let raw: RawPostDetail = serde_json::from_slice(&bytes)?;
    Ok(raw.into_detail(&post.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn http_locations_gain_a_trailing_slash() {
    let Location::Http(url) = Location::parse("https://example.org/site").unwrap() else {
      panic!("expected http location");
    };
    assert_eq!(url.as_str(), "https://example.org/site/");
    assert_eq!(url.join(INDEX_PATH).unwrap().as_str(), "https://example.org/site/data/index.json");
  }

  #[test]
  fn other_locations_are_directories() {
    assert_eq!(Location::parse("./public").unwrap(), Location::Dir(PathBuf::from("./public")));
    assert!(Location::parse("  ").is_err());
  }

  #[test]
  fn rejects_path_traversal_in_file_names() {
    assert!(is_safe_file_name("a8f3-k2.json"));
    assert!(!is_safe_file_name("../secret.json"));
    assert!(!is_safe_file_name("sub/x.json"));
    assert!(!is_safe_file_name(""));
  }
}
