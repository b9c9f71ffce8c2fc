//! `RemoteSource` against a stand-in REST service.

mod support;

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use axum::{
  Json, Router,
  extract::{Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  routing::{get, post},
};
use roster_client::{Catalog, RemoteConfig, RemoteSource};
use roster_core::{
  Error,
  source::DataSource,
  view::{DetailState, PostPage, ViewController},
};
use serde_json::json;

const ANON_KEY: &str = "anon-key";
const SESSION_TOKEN: &str = "session-token";

#[derive(Clone, Default)]
struct Backend {
  auth_down: Arc<AtomicBool>,
  rows_down: Arc<AtomicBool>,
  bearers:   Arc<Mutex<Vec<String>>>,
}

impl Backend {
  fn record(&self, headers: &HeaderMap) -> bool {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(ANON_KEY) {
      return false;
    }
    let bearer = headers
      .get("authorization")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .unwrap_or_default()
      .to_owned();
    self.bearers.lock().unwrap().push(bearer);
    true
  }

  fn bearers(&self) -> Vec<String> { self.bearers.lock().unwrap().clone() }
}

async fn signup(State(backend): State<Backend>, headers: HeaderMap) -> impl IntoResponse {
  if backend.auth_down.load(Ordering::SeqCst) || headers.get("apikey").is_none() {
    return StatusCode::SERVICE_UNAVAILABLE.into_response();
  }
  Json(json!({
    "access_token": SESSION_TOKEN,
    "refresh_token": "refresh",
    "user": { "id": "anon-user-1" }
  }))
  .into_response()
}

async fn people(State(backend): State<Backend>, headers: HeaderMap) -> impl IntoResponse {
  if !backend.record(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  if backend.rows_down.load(Ordering::SeqCst) {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  }
  Json(json!([
    {
      "id": 7,
      "name_en": "Ana Li",
      "location": "Toronto",
      "university": "UofT",
      "post_id": 101,
      "title": "Plagiarism report",
      "likes": "12",
      "date": "2025-05-01 08:00:00"
    },
    {
      "id": 8,
      "name_en": "Bo Chen",
      "location": "Montreal",
      "university": "McGill",
      "post_id": 102,
      "title": "Under review"
    },
    { "name_en": "No id" }
  ]))
  .into_response()
}

async fn posts(
  State(backend): State<Backend>,
  headers: HeaderMap,
  Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
  if !backend.record(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  assert_eq!(query.get("limit").map(String::as_str), Some("1"));
  assert!(query.get("select").is_some_and(|s| s.contains("people(")));

  // Row-level security: unapproved rows are invisible, like absent ones.
  let rows = match query.get("id").map(String::as_str) {
    Some("eq.101") => json!([{
      "id": 101,
      "title": "Plagiarism report",
      "created_at": "2025-05-01T08:00:00+00:00",
      "people": { "university": "UofT", "location": "Toronto" },
      "content": [{ "type": "p", "text": "Details." }],
      "images": []
    }]),
    Some("eq.not-a-number") => return StatusCode::BAD_REQUEST.into_response(),
    _ => json!([]),
  };
  Json(rows).into_response()
}

async fn remote() -> (RemoteSource, Backend) {
  let backend = Backend::default();
  let router = Router::new()
    .route("/auth/v1/signup", post(signup))
    .route("/rest/v1/people_index", get(people))
    .route("/rest/v1/posts", get(posts))
    .with_state(backend.clone());
  let base = support::serve(router).await;
  (RemoteSource::new(RemoteConfig::new(base, ANON_KEY)).unwrap(), backend)
}

#[tokio::test]
async fn signs_in_anonymously_and_uses_the_session_token() {
  let (source, backend) = remote().await;
  assert!(source.get_session().await.is_none());

  source.establish_session().await.unwrap();
  let session = source.get_session().await.unwrap();
  assert_eq!(session.access_token, SESSION_TOKEN);
  assert_eq!(session.user.unwrap().id, "anon-user-1");

  // A second call reuses the session.
  source.establish_session().await.unwrap();

  source.fetch_people().await.unwrap();
  assert_eq!(backend.bearers(), [SESSION_TOKEN]);
}

#[tokio::test]
async fn auth_failure_does_not_block_the_directory() {
  let (source, backend) = remote().await;
  backend.auth_down.store(true, Ordering::SeqCst);
  let catalog = Catalog::new(source);

  catalog.start().await;
  assert!(catalog.source().get_session().await.is_none());

  let dir = catalog.load_directory().await.unwrap();
  assert_eq!(dir.people.len(), 2);
  assert_eq!(backend.bearers(), [ANON_KEY]);
}

#[tokio::test]
async fn normalizes_flat_rows() {
  let (source, _) = remote().await;
  let catalog = Catalog::new(source);
  let dir = catalog.load_directory().await.unwrap();

  let ana = dir.person("7").unwrap();
  let post = ana.post.as_ref().unwrap();
  assert_eq!(post.id.as_deref(), Some("101"));
  assert_eq!(post.likes, 12);
  assert!(post.date.is_some());
  assert_eq!(dir.regions, ["Toronto", "Montreal"]);
  assert!(dir.posts.contains("102"));
}

#[tokio::test]
async fn fetches_an_approved_post_with_owner_meta() {
  let (source, _) = remote().await;
  let catalog = Catalog::new(source);

  let detail = catalog.load_post_detail("101").await.unwrap();
  assert_eq!(detail.id, "101");
  assert_eq!(detail.meta.university, "UofT");
  assert_eq!(detail.meta.location, "Toronto");
  assert_eq!(detail.paragraphs().collect::<Vec<_>>(), ["Details."]);
}

#[tokio::test]
async fn hidden_missing_and_malformed_posts_render_identically() {
  let (source, _) = remote().await;
  let catalog = Catalog::new(source);
  let mut views = ViewController::new();

  let mut pages = Vec::new();
  for id in ["102", "999", "not-a-number"] {
    let err = catalog.load_post_detail(id).await.unwrap_err();
    assert!(matches!(err, Error::PostNotFound(_)), "{id}: {err:?}");

    let roster_core::view::Navigation::LoadPost { token, .. } =
      views.navigate(&format!("#/post/{id}"))
    else {
      panic!("expected a post load");
    };
    assert!(views.resolve(token, Err(err)));
    assert_eq!(views.detail(), Some(&DetailState::Failed));
    pages.push(views.post_page().unwrap());
  }
  assert!(pages.iter().all(|p| *p == PostPage::from_state(&DetailState::Failed)));
}

#[tokio::test]
async fn server_errors_are_data_unavailable() {
  let (source, backend) = remote().await;
  backend.rows_down.store(true, Ordering::SeqCst);
  let catalog = Catalog::new(source);

  let err = catalog.load_directory().await.unwrap_err();
  assert!(matches!(err, Error::DataUnavailable(_)), "{err:?}");
  assert!(catalog.cached().is_none());
}
