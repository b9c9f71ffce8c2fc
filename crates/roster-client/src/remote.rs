//! [`RemoteSource`] is the hosted queryable backend.
//!
//! Speaks the PostgREST dialect used by hosted Postgres services:
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/v1/signup` | Body `{}`; anonymous sign-in, returns a session |
//! | `GET`  | `/rest/v1/<people_view>?select=*` | Flat index rows, one per person |
//! | `GET`  | `/rest/v1/<posts_table>?id=eq.<id>&limit=1` | Row-level security hides unapproved posts |
//!
//! Every request carries the project `apikey`. The bearer token is the
//! anonymous session's access token once one exists, the anon key before.

use reqwest::{RequestBuilder, StatusCode, Url};
use roster_core::{
  directory::{PeopleDocument, PostRef},
  person::PostDetail,
  source::DataSource,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
  Error, Result, http_client,
  raw::{RawPostDetail, normalize_people},
};

/// Columns requested for a post detail, including the owner join.
const POST_SELECT: &str = "id,title,content,images,created_at,people(university,location)";

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_people_view() -> String { "people_index".to_owned() }

fn default_posts_table() -> String { "posts".to_owned() }

/// Connection settings for the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
  /// Project base URL, e.g. `https://xyz.example.co`.
  pub url:         String,
  /// Public anonymous API key.
  pub anon_key:    String,
  #[serde(default = "default_people_view")]
  pub people_view: String,
  #[serde(default = "default_posts_table")]
  pub posts_table: String,
}

impl RemoteConfig {
  pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
    Self {
      url:         url.into(),
      anon_key:    anon_key.into(),
      people_view: default_people_view(),
      posts_table: default_posts_table(),
    }
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
  pub id: String,
}

/// An anonymous identity issued by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
  pub access_token:  String,
  #[serde(default)]
  pub refresh_token: Option<String>,
  #[serde(default)]
  pub user:          Option<SessionUser>,
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Async client for the remote people index and posts table.
pub struct RemoteSource {
  client:  reqwest::Client,
  base:    Url,
  config:  RemoteConfig,
  session: RwLock<Option<Session>>,
}

impl RemoteSource {
  pub fn new(config: RemoteConfig) -> Result<Self> {
    let trimmed = config.url.trim_end_matches('/');
    let base = Url::parse(&format!("{trimmed}/")).map_err(|e| Error::InvalidLocation {
      location: config.url.clone(),
      reason:   e.to_string(),
    })?;
    Ok(Self { client: http_client()?, base, config, session: RwLock::new(None) })
  }

  fn url(&self, path: &str) -> Result<Url> {
    self.base.join(path).map_err(|e| Error::InvalidLocation {
      location: path.to_owned(),
      reason:   e.to_string(),
    })
  }

  async fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    let token = match self.session.read().await.as_ref() {
      Some(session) => session.access_token.clone(),
      None => self.config.anon_key.clone(),
    };
    req.header("apikey", &self.config.anon_key).bearer_auth(token)
  }

  /// The current session, if one was established.
  pub async fn get_session(&self) -> Option<Session> { self.session.read().await.clone() }

  /// `POST /auth/v1/signup` with an empty body.
  pub async fn sign_in_anonymously(&self) -> Result<Session> {
    let url = self.url("auth/v1/signup")?;
    let resp = self
      .client
      .post(url.clone())
      .header("apikey", &self.config.anon_key)
      .json(&serde_json::json!({}))
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Auth(format!("{url} returned {}", resp.status())));
    }
    let session: Session = resp.json().await?;
    tracing::info!(
      user = session.user.as_ref().map(|u| u.id.as_str()).unwrap_or("-"),
      "signed in anonymously"
    );
    *self.session.write().await = Some(session.clone());
    Ok(session)
  }

  /// `GET` a table or view and decode the row set.
  async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>>
  where
    T: for<'de> Deserialize<'de>,
  {
    let url = self.url(&format!("rest/v1/{table}"))?;
    tracing::debug!(%url, ?query, "querying remote rows");

    let resp = self.auth(self.client.get(url.clone()).query(query)).await.send().await?;
    match resp.status() {
      status if status.is_success() => Ok(resp.json().await?),
      status => Err(Error::Status { url: url.to_string(), status }),
    }
  }
}

impl DataSource for RemoteSource {
  type Error = Error;

  async fn establish_session(&self) -> Result<()> {
    if self.get_session().await.is_some() {
      return Ok(());
    }
    self.sign_in_anonymously().await.map(|_| ())
  }

  async fn fetch_people(&self) -> Result<PeopleDocument> {
    let rows: Vec<serde_json::Value> = self
      .select(&self.config.people_view, &[("select", "*".to_owned())])
      .await?;
    Ok(PeopleDocument {
      people:       normalize_people(rows),
      regions:      Vec::new(),
      universities: Vec::new(),
    })
  }

  async fn fetch_post(&self, post: &PostRef) -> Result<Option<PostDetail>> {
    let query = [
      ("select", POST_SELECT.to_owned()),
      ("id", format!("eq.{}", post.id)),
      ("limit", "1".to_owned()),
    ];
    let rows = match self.select::<RawPostDetail>(&self.config.posts_table, &query).await {
      Ok(rows) => rows,
      // A malformed id (e.g. text against an integer column) cannot match.
      Err(Error::Status { status: StatusCode::BAD_REQUEST, .. }) => return Ok(None),
      Err(e) => return Err(e),
    };
    Ok(rows.into_iter().next().and_then(|raw| raw.into_detail(&post.id)))
  }
}
