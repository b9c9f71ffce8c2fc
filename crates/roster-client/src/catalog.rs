//! [`Catalog`] is the load-once directory cache in front of a data source.

use std::sync::Arc;

use roster_core::{
  Error,
  directory::{Directory, PostRef},
  person::PostDetail,
  source::DataSource,
};
use tokio::sync::OnceCell;

/// Owns the canonical [`Directory`] for the session.
///
/// The directory is fetched at most once per successful load: concurrent
/// early callers share the same in-flight fetch, and every later call is a
/// cache hit. A failed load leaves the cache empty so a later call can try
/// again. Post details are never cached.
pub struct Catalog<S> {
  source:    S,
  directory: OnceCell<Arc<Directory>>,
}

impl<S: DataSource> Catalog<S> {
  pub fn new(source: S) -> Self { Self { source, directory: OnceCell::new() } }

  pub fn source(&self) -> &S { &self.source }

  /// Best-effort session acquisition. Failure is logged and swallowed so it
  /// never blocks directory loading.
  pub async fn start(&self) {
    if let Err(e) = self.source.establish_session().await {
      tracing::warn!(error = %e, "anonymous session unavailable; continuing without one");
    }
  }

  /// The cached directory, if it has been loaded.
  pub fn cached(&self) -> Option<Arc<Directory>> { self.directory.get().cloned() }

  /// Load the directory, or return the cached one.
  pub async fn load_directory(&self) -> Result<Arc<Directory>, Error> {
    if let Some(dir) = self.directory.get() {
      tracing::debug!("directory cache hit");
      return Ok(dir.clone());
    }

    self
      .directory
      .get_or_try_init(|| async {
        let doc = self.source.fetch_people().await.map_err(|e| {
          tracing::error!(error = %e, "failed to load directory");
          Error::DataUnavailable(e.to_string())
        })?;
        let dir = Directory::from_document(doc);
        tracing::info!(
          people = dir.people.len(),
          posts = dir.posts.len(),
          "directory loaded"
        );
        Ok::<_, Error>(Arc::new(dir))
      })
      .await
      .cloned()
  }

  /// Fetch a post detail, fresh every time.
  ///
  /// Absent and unapproved posts both fail with [`Error::PostNotFound`];
  /// transport failures with [`Error::DataUnavailable`].
  pub async fn load_post_detail(&self, post_id: &str) -> Result<PostDetail, Error> {
    let dir = self.load_directory().await?;
    let post = dir
      .posts
      .get(post_id)
      .cloned()
      .unwrap_or_else(|| PostRef::by_id(post_id));

    match self.source.fetch_post(&post).await {
      Ok(Some(detail)) => Ok(detail),
      Ok(None) => Err(Error::PostNotFound(post_id.to_owned())),
      Err(e) => Err(Error::DataUnavailable(e.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
  };

  use roster_core::{
    directory::PeopleDocument,
    person::{Person, PostMeta},
  };

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("backend down")]
  struct Down;

  #[derive(Default)]
  struct FakeSource {
    people:        Vec<Person>,
    posts:         HashMap<String, PostDetail>,
    fail_people:   AtomicBool,
    fail_session:  bool,
    people_calls:  AtomicUsize,
    post_calls:    AtomicUsize,
    session_calls: AtomicUsize,
  }

  impl DataSource for FakeSource {
    type Error = Down;

    async fn establish_session(&self) -> Result<(), Down> {
      self.session_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_session { Err(Down) } else { Ok(()) }
    }

    async fn fetch_people(&self) -> Result<PeopleDocument, Down> {
      self.people_calls.fetch_add(1, Ordering::SeqCst);
      tokio::time::sleep(Duration::from_millis(20)).await;
      if self.fail_people.load(Ordering::SeqCst) {
        return Err(Down);
      }
      Ok(PeopleDocument { people: self.people.clone(), ..Default::default() })
    }

    async fn fetch_post(&self, post: &PostRef) -> Result<Option<PostDetail>, Down> {
      self.post_calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.posts.get(&post.id).cloned())
    }
  }

  fn detail(id: &str) -> PostDetail {
    PostDetail {
      id:      id.into(),
      title:   format!("title {id}"),
      meta:    PostMeta::default(),
      content: vec![],
      images:  vec![],
    }
  }

  #[tokio::test]
  async fn directory_is_loaded_once() {
    let catalog = Catalog::new(FakeSource::default());
    assert!(catalog.cached().is_none());

    catalog.load_directory().await.unwrap();
    catalog.load_directory().await.unwrap();
    assert_eq!(catalog.source().people_calls.load(Ordering::SeqCst), 1);
    assert!(catalog.cached().is_some());
  }

  #[tokio::test]
  async fn concurrent_loads_share_one_fetch() {
    let catalog = Catalog::new(FakeSource::default());
    let (a, b, c) = tokio::join!(
      catalog.load_directory(),
      catalog.load_directory(),
      catalog.load_directory()
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(catalog.source().people_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn failed_load_propagates_and_is_not_cached() {
    let source = FakeSource::default();
    source.fail_people.store(true, Ordering::SeqCst);
    let catalog = Catalog::new(source);

    let err = catalog.load_directory().await.unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));
    assert!(catalog.cached().is_none());

    catalog.source().fail_people.store(false, Ordering::SeqCst);
    catalog.load_directory().await.unwrap();
    assert_eq!(catalog.source().people_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn post_details_are_fetched_fresh() {
    let source = FakeSource {
      posts: HashMap::from([("p1".to_owned(), detail("p1"))]),
      ..Default::default()
    };
    let catalog = Catalog::new(source);

    assert_eq!(catalog.load_post_detail("p1").await.unwrap().title, "title p1");
    catalog.load_post_detail("p1").await.unwrap();
    assert_eq!(catalog.source().post_calls.load(Ordering::SeqCst), 2);
    assert_eq!(catalog.source().people_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn missing_post_is_not_found() {
    let catalog = Catalog::new(FakeSource::default());
    let err = catalog.load_post_detail("ghost").await.unwrap_err();
    assert!(matches!(err, Error::PostNotFound(id) if id == "ghost"));
  }

  #[tokio::test]
  async fn session_failure_does_not_block_loading() {
    let catalog = Catalog::new(FakeSource { fail_session: true, ..Default::default() });
    catalog.start().await;
    assert_eq!(catalog.source().session_calls.load(Ordering::SeqCst), 1);
    assert!(catalog.load_directory().await.is_ok());
  }
}
