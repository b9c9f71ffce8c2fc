//! The `DataSource` and `PreferenceStore` traits.
//!
//! Both are implemented outside this crate: data sources in `roster-client`
//! (static document or remote queryable service), preference storage in
//! `roster-store-sqlite`. Higher layers depend on these abstractions, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  directory::{PeopleDocument, PostRef},
  person::PostDetail,
};

// ─── DataSource ──────────────────────────────────────────────────────────────

/// A backing mechanism for the people collection and post details.
///
/// Implementations normalize whatever shape their backend returns into the
/// types of [`crate::person`]; nothing downstream sees raw records.
///
/// All methods return `Send` futures so sources can be driven from spawned
/// tasks.
pub trait DataSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Acquire an anonymous identity if the backend needs one. Called once at
  /// startup, best effort. Sources without identity succeed immediately.
  fn establish_session(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch and normalize the full people collection.
  fn fetch_people(
    &self,
  ) -> impl Future<Output = Result<PeopleDocument, Self::Error>> + Send + '_;

  /// Fetch one post detail.
  ///
  /// Returns `Ok(None)` when no readable record exists: either the post is
  /// absent or it fails the backend's approval predicate. The two cases must
  /// be indistinguishable to the caller.
  fn fetch_post<'a>(
    &'a self,
    post: &'a PostRef,
  ) -> impl Future<Output = Result<Option<PostDetail>, Self::Error>> + Send + 'a;
}

// ─── PreferenceStore ─────────────────────────────────────────────────────────

/// A local persistent string key-value store.
///
/// No locking is implied; single-key reads and writes are expected to be
/// atomic in the backend.
pub trait PreferenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
