//! Application state machine and event dispatcher.

use std::{collections::BTreeSet, sync::Arc};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_client::{Catalog, Source};
use roster_core::{
  directory::Directory,
  feed::{FeedItem, FeedMode, RecencyWindow, build_feed},
  follow::Follows,
  mask::display_name,
  person::{Person, PostDetail},
  route::{Anchor, Route},
  search::{KeywordPolicy, SearchFilter, SearchOutcome, filter_people},
  takedown::TakedownForm,
  view::{Navigation, RequestToken, View, ViewController},
};
use roster_store_sqlite::SqlitePreferences;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

/// A finished post-detail load, tagged with the request that started it.
pub type Loaded = (RequestToken, roster_core::Result<PostDetail>);

// ─── Modes ────────────────────────────────────────────────────────────────────

/// Which home pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// The hot/new feed.
  Feed,
  /// Discover: search form and results.
  Results,
}

/// What a line-input prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
  Keyword,
  Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakedownField {
  Contact,
  Reason,
}

/// The take-down form while it is open.
#[derive(Debug, Clone)]
pub struct Takedown {
  pub form:  TakedownForm,
  pub field: TakedownField,
  pub error: Option<String>,
}

impl Takedown {
  fn field_mut(&mut self) -> &mut String {
    match self.field {
      TakedownField::Contact => &mut self.form.contact,
      TakedownField::Reason => &mut self.form.reason,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Route state and the post view.
  pub views: ViewController,

  /// The directory loaded at startup.
  pub directory: Arc<Directory>,

  pub focus:         Focus,
  pub feed_mode:     FeedMode,
  pub feed_cursor:   usize,
  pub result_cursor: usize,

  /// Search form state.
  pub filter: SearchFilter,
  pub policy: KeywordPolicy,

  /// Active line prompt and its buffer.
  pub input:     Option<Input>,
  pub input_buf: String,

  /// Privacy display mode.
  pub masked: bool,

  /// Snapshot of the follow set, re-read after every toggle.
  pub followed: BTreeSet<String>,

  pub takedown: Option<Takedown>,

  /// Scroll offset within the post view.
  pub detail_scroll: u16,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  catalog:   Arc<Catalog<Source>>,
  follows:   Follows<SqlitePreferences>,
  loaded_tx: mpsc::UnboundedSender<Loaded>,
}

impl App {
  pub fn new(
    catalog: Arc<Catalog<Source>>,
    directory: Arc<Directory>,
    follows: Follows<SqlitePreferences>,
    policy: KeywordPolicy,
    loaded_tx: mpsc::UnboundedSender<Loaded>,
  ) -> Self {
    Self {
      views: ViewController::new(),
      directory,
      focus: Focus::Feed,
      feed_mode: FeedMode::default(),
      feed_cursor: 0,
      result_cursor: 0,
      filter: SearchFilter::default(),
      policy,
      input: None,
      input_buf: String::new(),
      masked: false,
      followed: BTreeSet::new(),
      takedown: None,
      detail_scroll: 0,
      status_msg: String::new(),
      catalog,
      follows,
      loaded_tx,
    }
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  pub fn feed(&self) -> Vec<FeedItem<'_>> {
    build_feed(&self.directory.people, self.feed_mode, Utc::now())
  }

  pub fn results(&self) -> SearchOutcome<'_> {
    filter_people(&self.directory.people, &self.filter, self.policy)
  }

  /// The person under the cursor of the focused pane.
  pub fn selected_person(&self) -> Option<&Person> {
    match self.focus {
      Focus::Feed => self.feed().get(self.feed_cursor).map(|item| item.person),
      Focus::Results => self.results().matches().get(self.result_cursor).copied(),
    }
  }

  /// A person's name as currently displayed.
  pub fn name_of(&self, person: &Person) -> String {
    let name = if person.name_cn.is_empty() { &person.name_en } else { &person.name_cn };
    display_name(name, self.masked)
  }

  pub async fn refresh_follows(&mut self) { self.followed = self.follows.followed().await; }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Handle a hash change, spawning the detail load for post routes.
  pub fn navigate(&mut self, hash: &str) {
    match self.views.navigate(hash) {
      Navigation::ShowHome { anchor } => match anchor {
        Some(Anchor::HotSection) => self.focus = Focus::Feed,
        Some(Anchor::Discover) => self.focus = Focus::Results,
        None => {}
      },
      Navigation::LoadPost { post_id, token } => {
        self.detail_scroll = 0;
        let catalog = self.catalog.clone();
        let tx = self.loaded_tx.clone();
        tokio::spawn(async move {
          let result = catalog.load_post_detail(&post_id).await;
          // The receiver is gone only when the app is shutting down.
          let _ = tx.send((token, result));
        });
      }
    }
  }

  pub fn apply_loaded(&mut self, (token, result): Loaded) { self.views.resolve(token, result); }

  fn open_selected(&mut self) {
    let post_id = self
      .selected_person()
      .and_then(Person::available_post)
      .and_then(|post| post.id.clone());
    match post_id {
      Some(id) => self.navigate(&Route::post(id).to_hash()),
      None => self.status_msg = "No post to open.".into(),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.takedown.is_some() {
      self.handle_takedown_key(key);
      return true;
    }
    if let Some(input) = self.input {
      self.handle_input_key(input, key);
      return true;
    }

    match self.views.view() {
      View::Home => self.handle_home_key(key).await,
      View::Post => self.handle_post_key(key),
    }
  }

  fn handle_input_key(&mut self, input: Input, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.input = None;
        self.input_buf.clear();
      }
      KeyCode::Enter => {
        self.input = None;
        let value = std::mem::take(&mut self.input_buf);
        match input {
          Input::Keyword => {
            self.filter.keyword = value;
            self.result_cursor = 0;
            self.focus = Focus::Results;
          }
          Input::Route => self.navigate(&value),
        }
      }
      KeyCode::Backspace => {
        self.input_buf.pop();
      }
      KeyCode::Char(c) => self.input_buf.push(c),
      _ => {}
    }
  }

  fn handle_takedown_key(&mut self, key: KeyEvent) {
    let Some(overlay) = self.takedown.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Esc => self.takedown = None,
      KeyCode::Tab | KeyCode::BackTab => {
        overlay.field = match overlay.field {
          TakedownField::Contact => TakedownField::Reason,
          TakedownField::Reason => TakedownField::Contact,
        };
      }
      KeyCode::Backspace => {
        overlay.field_mut().pop();
      }
      KeyCode::Char(c) => overlay.field_mut().push(c),
      KeyCode::Enter => match overlay.form.submit() {
        Ok(ack) => {
          self.status_msg = ack.to_owned();
          self.takedown = None;
        }
        Err(e) => overlay.error = Some(e.to_string()),
      },
      _ => {}
    }
  }

  async fn handle_home_key(&mut self, key: KeyEvent) -> bool {
    self.status_msg.clear();
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Panes
      KeyCode::Tab => {
        self.focus = match self.focus {
          Focus::Feed => Focus::Results,
          Focus::Results => Focus::Feed,
        };
      }
      KeyCode::Char('H') => self.navigate("#/hot"),
      KeyCode::Char('D') => self.navigate("#/discover"),

      // Cursor
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.focused_len();
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
          *cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_selected(),

      // Feed
      KeyCode::Char('w') => {
        self.feed_mode = FeedMode::Hot(match self.feed_mode {
          FeedMode::Hot(window) => next_window(window),
          FeedMode::New => RecencyWindow::default(),
        });
        self.feed_cursor = 0;
      }
      KeyCode::Char('n') => {
        self.feed_mode = match self.feed_mode {
          FeedMode::Hot(_) => FeedMode::New,
          FeedMode::New => FeedMode::default(),
        };
        self.feed_cursor = 0;
      }

      // Search
      KeyCode::Char('/') => {
        self.input = Some(Input::Keyword);
        self.input_buf = self.filter.keyword.clone();
      }
      KeyCode::Char('g') => {
        self.filter.gender = cycle(&self.directory.genders(), &self.filter.gender);
        self.result_cursor = 0;
      }
      KeyCode::Char('r') => {
        self.filter.location = cycle(&self.directory.regions, &self.filter.location);
        self.result_cursor = 0;
      }
      KeyCode::Char('u') => {
        self.filter.university = cycle(&self.directory.universities, &self.filter.university);
        self.result_cursor = 0;
      }
      KeyCode::Char('c') => {
        self.filter = SearchFilter::default();
        self.result_cursor = 0;
      }

      // Per-record actions
      KeyCode::Char('f') => {
        if let Some(id) = self.selected_person().map(|p| p.id.clone()) {
          let now = self.follows.toggle(&id).await;
          self.refresh_follows().await;
          self.status_msg = if now { "Following." } else { "Unfollowed." }.into();
        }
      }
      KeyCode::Char('x') => {
        if let Some(name) = self.selected_person().map(|p| self.name_of(p)) {
          self.takedown = Some(Takedown {
            form:  TakedownForm::for_person(name),
            field: TakedownField::Reason,
            error: None,
          });
        }
      }

      // Display
      KeyCode::Char('m') => self.masked = !self.masked,

      // Route prompt
      KeyCode::Char(':') => {
        self.input = Some(Input::Route);
        self.input_buf = "#/".into();
      }

      _ => {}
    }
    true
  }

  fn handle_post_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h' | 'b') => {
        let href = self
          .views
          .post_page()
          .and_then(|page| page.back)
          .map(|back| back.href)
          .unwrap_or_else(|| Route::default().to_hash());
        self.navigate(&href);
      }

      KeyCode::Down | KeyCode::Char('j') => self.detail_scroll = self.detail_scroll.saturating_add(1),
      KeyCode::Up | KeyCode::Char('k') => self.detail_scroll = self.detail_scroll.saturating_sub(1),

      KeyCode::Char('m') => self.masked = !self.masked,
      KeyCode::Char(':') => {
        self.input = Some(Input::Route);
        self.input_buf = "#/".into();
      }

      _ => {}
    }
    true
  }

  fn focused_len(&self) -> usize {
    match self.focus {
      Focus::Feed => self.feed().len(),
      Focus::Results => self.results().matches().len(),
    }
  }

  fn cursor_mut(&mut self) -> &mut usize {
    match self.focus {
      Focus::Feed => &mut self.feed_cursor,
      Focus::Results => &mut self.result_cursor,
    }
  }
}

fn next_window(window: RecencyWindow) -> RecencyWindow {
  RecencyWindow::iter()
    .cycle()
    .skip_while(|w| *w != window)
    .nth(1)
    .unwrap_or_default()
}

/// The option after `current`; the empty "any" value follows the last one.
fn cycle(options: &[String], current: &str) -> String {
  if current.is_empty() {
    return options.first().cloned().unwrap_or_default();
  }
  options
    .iter()
    .position(|o| o == current)
    .and_then(|i| options.get(i + 1))
    .cloned()
    .unwrap_or_default()
}
