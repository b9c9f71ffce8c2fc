//! Integration tests for `SqlitePreferences` against an in-memory database.

use roster_core::{
  follow::{FOLLOW_KEY, Follows},
  source::PreferenceStore,
};

use crate::SqlitePreferences;

async fn store() -> SqlitePreferences {
  SqlitePreferences::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Raw key-value access ────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_key_returns_none() {
  let s = store().await;
  assert_eq!(s.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_get() {
  let s = store().await;
  s.set("theme", "dark".into()).await.unwrap();
  assert_eq!(s.get("theme").await.unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn set_overwrites_existing_value() {
  let s = store().await;
  s.set("theme", "dark".into()).await.unwrap();
  s.set("theme", "light".into()).await.unwrap();
  assert_eq!(s.get("theme").await.unwrap().as_deref(), Some("light"));
}

#[tokio::test]
async fn keys_are_independent() {
  let s = store().await;
  s.set("a", "1".into()).await.unwrap();
  s.set("b", "2".into()).await.unwrap();
  assert_eq!(s.get("a").await.unwrap().as_deref(), Some("1"));
  assert_eq!(s.get("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn remove_deletes_key() {
  let s = store().await;
  s.set("a", "1".into()).await.unwrap();
  assert!(s.remove("a").await.unwrap());
  assert!(!s.remove("a").await.unwrap());
  assert_eq!(s.get("a").await.unwrap(), None);
}

// ─── Follow set on SQLite ────────────────────────────────────────────────────

#[tokio::test]
async fn follows_round_trip_through_sqlite() {
  let s = store().await;
  let follows = Follows::new(s.clone());

  assert!(follows.toggle("42").await);
  assert!(follows.toggle("7").await);
  assert_eq!(s.get(FOLLOW_KEY).await.unwrap().as_deref(), Some(r#"["42","7"]"#));

  assert!(!follows.toggle("42").await);
  assert!(!follows.is_followed("42").await);
  assert!(follows.is_followed("7").await);
}

#[tokio::test]
async fn corrupt_follow_value_is_ignored() {
  let s = store().await;
  s.set(FOLLOW_KEY, "oops".into()).await.unwrap();

  let follows = Follows::new(s.clone());
  assert!(follows.followed().await.is_empty());
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("prefs.db");

  {
    let s = SqlitePreferences::open(&path).await.unwrap();
    Follows::new(s).toggle("9").await;
  }

  let reopened = SqlitePreferences::open(&path).await.unwrap();
  assert!(Follows::new(reopened).is_followed("9").await);
}
