//! The router-driven view controller.
//!
//! Exactly one of two top-level views is visible. Navigation is driven by a
//! single hash-change signal: [`ViewController::navigate`] parses the hash,
//! swaps the visible view and tells the caller what side effect to run. Post
//! detail loads are asynchronous and tagged with a [`RequestToken`]; only the
//! response for the latest pending token is applied, so a slow response for a
//! route the user has already left cannot overwrite the current content.

use crate::{
  Error,
  person::{ImageRef, PostDetail},
  route::{Anchor, Route},
};

/// Title shown while a post is loading.
pub const LOADING_TITLE: &str = "Loading…";
/// Title shown for every failed post load.
pub const FAILURE_TITLE: &str = "Content failed to load";
/// Body shown for every failed post load. Deliberately says nothing about why.
pub const FAILURE_BODY: &str = "Sorry, this post cannot be opened right now.";
/// Label of the link back home on the failure page.
pub const BACK_LABEL: &str = "Back to home";

// ─── State ───────────────────────────────────────────────────────────────────

/// The two mutually exclusive top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Home,
  Post,
}

/// Identifies one post-detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Progress of the detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
  Loading,
  Loaded(PostDetail),
  /// Load failed. Carries no cause: not-found, unapproved and
  /// transport failures render identically.
  Failed,
}

/// Side effect the caller must perform after a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
  /// Home is visible; scroll to the anchor if there is one and it exists.
  ShowHome { anchor: Option<Anchor> },
  /// Post view is visible with a loading placeholder; fetch `post_id` and
  /// hand the result back with `token`.
  LoadPost { post_id: String, token: RequestToken },
}

// ─── Controller ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ViewController {
  route:      Route,
  view:       View,
  detail:     Option<DetailState>,
  pending:    Option<RequestToken>,
  next_token: u64,
}

impl Default for ViewController {
  fn default() -> Self { Self::new() }
}

impl ViewController {
  pub fn new() -> Self {
    Self {
      route:      Route::default(),
      view:       View::Home,
      detail:     None,
      pending:    None,
      next_token: 0,
    }
  }

  pub fn route(&self) -> &Route { &self.route }

  pub fn view(&self) -> View { self.view }

  /// Detail state of the post view; `None` while home is showing.
  pub fn detail(&self) -> Option<&DetailState> { self.detail.as_ref() }

  /// Handle a hash change.
  pub fn navigate(&mut self, hash: &str) -> Navigation {
    let route = Route::parse(hash);
    tracing::debug!(%route, "navigate");
    self.route = route.clone();

    match route {
      Route::Home { anchor } => {
        self.view = View::Home;
        self.detail = None;
        self.pending = None;
        Navigation::ShowHome { anchor }
      }
      Route::Post { id } => {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.view = View::Post;
        self.detail = Some(DetailState::Loading);
        self.pending = Some(token);
        Navigation::LoadPost { post_id: id, token }
      }
    }
  }

  /// Apply the outcome of a detail load. Returns `false` and changes nothing
  /// when `token` is not the latest pending request.
  pub fn resolve(&mut self, token: RequestToken, result: Result<PostDetail, Error>) -> bool {
    if self.pending != Some(token) {
      tracing::debug!(?token, "discarding stale post response");
      return false;
    }
    self.pending = None;
    self.detail = Some(match result {
      Ok(detail) => DetailState::Loaded(detail),
      Err(e) => {
        tracing::warn!(error = %e, "post detail failed to load");
        DetailState::Failed
      }
    });
    true
  }

  /// Render model for the post view, if it is the visible one.
  pub fn post_page(&self) -> Option<PostPage> {
    match self.view {
      View::Post => self.detail.as_ref().map(PostPage::from_state),
      View::Home => None,
    }
  }
}

// ─── Render model ────────────────────────────────────────────────────────────

/// A link back to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLink {
  pub label: &'static str,
  pub href:  String,
}

/// What the post view displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
  pub title:      String,
  /// `university · location · created`, blank while loading or failed.
  pub meta:       String,
  pub paragraphs: Vec<String>,
  /// Shown after the content.
  pub images:     Vec<ImageRef>,
  pub back:       Option<BackLink>,
}

impl PostPage {
  pub fn from_state(state: &DetailState) -> Self {
    match state {
      DetailState::Loading => Self {
        title:      LOADING_TITLE.to_owned(),
        meta:       String::new(),
        paragraphs: Vec::new(),
        images:     Vec::new(),
        back:       None,
      },
      DetailState::Loaded(detail) => Self {
        title:      detail.title.clone(),
        meta:       format!(
          "{} · {} · {}",
          or_dash(&detail.meta.university),
          or_dash(&detail.meta.location),
          detail
            .meta
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        ),
        paragraphs: detail.paragraphs().map(str::to_owned).collect(),
        images:     detail.images.clone(),
        back:       None,
      },
      DetailState::Failed => Self {
        title:      FAILURE_TITLE.to_owned(),
        meta:       String::new(),
        paragraphs: vec![FAILURE_BODY.to_owned()],
        images:     Vec::new(),
        back:       Some(BackLink { label: BACK_LABEL, href: Route::default().to_hash() }),
      },
    }
  }
}

fn or_dash(s: &str) -> &str { if s.is_empty() { "-" } else { s } }
