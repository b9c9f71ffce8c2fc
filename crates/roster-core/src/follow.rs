//! Client-local follow state.
//!
//! The followed set is persisted as a JSON array of person ids under
//! [`FOLLOW_KEY`]. It is read fresh on every query and written fresh on every
//! toggle; nothing is cached in memory, so separate processes sharing the
//! store stay loosely consistent.
//!
//! A missing, unreadable or malformed value is treated as the empty set.

use std::collections::BTreeSet;

use crate::{Error, Result, source::PreferenceStore};

/// Storage key of the followed set.
pub const FOLLOW_KEY: &str = "follow:people";

/// Follow operations over a [`PreferenceStore`].
#[derive(Debug, Clone)]
pub struct Follows<P> {
  store: P,
}

impl<P: PreferenceStore> Follows<P> {
  pub fn new(store: P) -> Self { Self { store } }

  /// The persisted set, or empty when the store is unavailable or corrupt.
  pub async fn followed(&self) -> BTreeSet<String> {
    let raw = match self.store.get(FOLLOW_KEY).await {
      Ok(raw) => raw,
      Err(e) => {
        tracing::warn!(error = %e, "preference store unavailable; treating follows as empty");
        return BTreeSet::new();
      }
    };
    match raw.as_deref().map(decode).transpose() {
      Ok(set) => set.unwrap_or_default(),
      Err(e) => {
        tracing::warn!(error = %e, "ignoring corrupt follow set");
        BTreeSet::new()
      }
    }
  }

  pub async fn is_followed(&self, id: &str) -> bool { self.followed().await.contains(id) }

  /// Flip membership of `id`, persist, and return the new membership.
  ///
  /// A failed write is logged and the computed membership is still returned.
  pub async fn toggle(&self, id: &str) -> bool {
    let mut set = self.followed().await;
    let now_followed = if set.remove(id) {
      false
    } else {
      set.insert(id.to_owned());
      true
    };

    match encode(&set) {
      Ok(value) => {
        if let Err(e) = self.store.set(FOLLOW_KEY, value).await {
          tracing::warn!(error = %e, id, "failed to persist follow set");
        }
      }
      Err(e) => tracing::warn!(error = %e, "failed to encode follow set"),
    }
    now_followed
  }
}

fn decode(raw: &str) -> Result<BTreeSet<String>> {
  serde_json::from_str::<Vec<String>>(raw)
    .map(|ids| ids.into_iter().collect())
    .map_err(|e| Error::PreferenceStoreCorrupt(e.to_string()))
}

/// Sorted, so re-adding an id reproduces the same bytes.
fn encode(set: &BTreeSet<String>) -> Result<String> { Ok(serde_json::to_string(set)?) }
