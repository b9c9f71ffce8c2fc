//! Hash-fragment routes.
//!
//! | Hash | Route |
//! |------|-------|
//! | `#/post/<id>` | [`Route::Post`] |
//! | `#/hot…` | [`Route::Home`] anchored at the hot section |
//! | `#/discover…` | [`Route::Home`] anchored at discover |
//! | anything else | [`Route::Home`] without anchor |

use std::fmt;

const POST_PREFIX: &str = "#/post/";
const HOT_PREFIX: &str = "#/hot";
const DISCOVER_PREFIX: &str = "#/discover";

/// A scroll target inside the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
  HotSection,
  Discover,
}

impl Anchor {
  /// Element id of the anchor target.
  pub fn element_id(self) -> &'static str {
    match self {
      Self::HotSection => "hot-section",
      Self::Discover => "discover",
    }
  }
}

/// A parsed navigation intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home { anchor: Option<Anchor> },
  Post { id: String },
}

impl Default for Route {
  fn default() -> Self { Self::Home { anchor: None } }
}

impl Route {
  /// Parse a location hash. Never fails: unknown hashes land on home.
  pub fn parse(hash: &str) -> Self {
    let hash = hash.trim();
    if let Some(id) = hash.strip_prefix(POST_PREFIX) {
      if id.is_empty() {
        return Self::default();
      }
      return Self::Post { id: id.to_owned() };
    }
    if hash.starts_with(HOT_PREFIX) {
      return Self::Home { anchor: Some(Anchor::HotSection) };
    }
    if hash.starts_with(DISCOVER_PREFIX) {
      return Self::Home { anchor: Some(Anchor::Discover) };
    }
    Self::default()
  }

  pub fn post(id: impl Into<String>) -> Self { Self::Post { id: id.into() } }

  /// The canonical hash for this route.
  pub fn to_hash(&self) -> String {
    match self {
      Self::Home { anchor: None } => "#/".to_owned(),
      Self::Home { anchor: Some(Anchor::HotSection) } => HOT_PREFIX.to_owned(),
      Self::Home { anchor: Some(Anchor::Discover) } => DISCOVER_PREFIX.to_owned(),
      Self::Post { id } => format!("{POST_PREFIX}{id}"),
    }
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hash()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_each_route_kind() {
    assert_eq!(Route::parse("#/post/abc-123"), Route::post("abc-123"));
    assert_eq!(Route::parse("#/hot"), Route::Home { anchor: Some(Anchor::HotSection) });
    assert_eq!(Route::parse("#/hot?tab=month"), Route::Home {
      anchor: Some(Anchor::HotSection),
    });
    assert_eq!(Route::parse("#/discover"), Route::Home { anchor: Some(Anchor::Discover) });
    assert_eq!(Route::parse("#/"), Route::default());
  }

  #[test]
  fn unknown_and_empty_hashes_go_home() {
    for hash in ["", "#", "#/people", "post/1", "#/post/"] {
      assert_eq!(Route::parse(hash), Route::default(), "hash {hash:?}");
    }
  }

  #[test]
  fn canonical_hashes_parse_back() {
    for route in [
      Route::default(),
      Route::Home { anchor: Some(Anchor::HotSection) },
      Route::Home { anchor: Some(Anchor::Discover) },
      Route::post("9f"),
    ] {
      assert_eq!(Route::parse(&route.to_hash()), route);
    }
  }
}
