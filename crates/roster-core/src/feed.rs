//! The hot/new post feed, flattened out of the people collection.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::person::{Person, PostSummary};

// ─── FeedItem ────────────────────────────────────────────────────────────────

/// A post summary joined with its owner's display facets.
#[derive(Debug, Clone, Copy)]
pub struct FeedItem<'a> {
  pub person: &'a Person,
  pub post:   &'a PostSummary,
}

impl FeedItem<'_> {
  /// The post date, or the epoch when it is missing.
  pub fn date_or_epoch(&self) -> DateTime<Utc> {
    self.post.date.unwrap_or(DateTime::UNIX_EPOCH)
  }
}

/// One item per person whose post has a non-empty title. Output order follows
/// `people`, but callers should sort explicitly.
pub fn flatten_feed(people: &[Person]) -> Vec<FeedItem<'_>> {
  people
    .iter()
    .filter_map(|person| {
      person.available_post().map(|post| FeedItem { person, post })
    })
    .collect()
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Stable sort, most-liked first.
pub fn sort_by_likes_desc(items: &mut [FeedItem<'_>]) {
  items.sort_by(|a, b| b.post.likes.cmp(&a.post.likes));
}

/// Stable sort, newest first. Missing dates sort as the epoch.
pub fn sort_by_date_desc(items: &mut [FeedItem<'_>]) {
  items.sort_by_key(|item| std::cmp::Reverse(item.date_or_epoch()));
}

// ─── Recency windows ─────────────────────────────────────────────────────────

/// How far back the hot feed reaches.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Display,
  EnumString,
  EnumIter,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecencyWindow {
  #[default]
  Week,
  Month,
  All,
}

impl RecencyWindow {
  /// The oldest date still inside the window, or `None` for [`Self::All`].
  ///
  /// `Month` steps back one calendar month, clamping to the last valid day
  /// (31 March becomes 28 or 29 February).
  pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match self {
      Self::Week => Some(now - Duration::days(7)),
      Self::Month => {
        Some(now.checked_sub_months(Months::new(1)).unwrap_or(DateTime::UNIX_EPOCH))
      }
      Self::All => None,
    }
  }
}

/// Keep items dated on or after the window's cutoff.
pub fn window_by_recency<'a>(
  items: Vec<FeedItem<'a>>,
  window: RecencyWindow,
  now: DateTime<Utc>,
) -> Vec<FeedItem<'a>> {
  match window.cutoff(now) {
    Some(cutoff) => {
      items.into_iter().filter(|item| item.date_or_epoch() >= cutoff).collect()
    }
    None => items,
  }
}

// ─── Feed modes ──────────────────────────────────────────────────────────────

/// Which feed the home view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
  /// Windowed, most-liked first.
  Hot(RecencyWindow),
  /// Everything, newest first.
  New,
}

impl Default for FeedMode {
  fn default() -> Self { Self::Hot(RecencyWindow::default()) }
}

/// Flatten, window and sort `people` for `mode`.
pub fn build_feed(
  people: &[Person],
  mode: FeedMode,
  now: DateTime<Utc>,
) -> Vec<FeedItem<'_>> {
  let items = flatten_feed(people);
  match mode {
    FeedMode::Hot(window) => {
      let mut items = window_by_recency(items, window, now);
      sort_by_likes_desc(&mut items);
      items
    }
    FeedMode::New => {
      let mut items = items;
      sort_by_date_desc(&mut items);
      items
    }
  }
}
