//! Person and post types: the normalized in-memory shape of the directory.
//!
//! Backing sources disagree on how a person's post is laid out (flat fields on
//! the person versus a nested object). That variance is resolved by the data
//! source adapter; everything in this module is already normalized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─── Person ──────────────────────────────────────────────────────────────────

/// One directory entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
  /// Opaque identifier, unique across the collection.
  pub id:             String,
  /// Localized display name.
  pub name_cn:        String,
  /// Romanized display name.
  pub name_en:        String,
  pub gender:         String,
  pub location:       String,
  pub university:     String,
  pub incidents:      u32,
  pub last_report_at: Option<DateTime<Utc>>,
  /// The person's most recent qualifying post, if any.
  pub post:           Option<PostSummary>,
}

impl Person {
  /// The post summary, but only when it carries a non-empty title.
  pub fn available_post(&self) -> Option<&PostSummary> {
    self.post.as_ref().filter(|p| p.is_available())
  }
}

// ─── PostSummary ─────────────────────────────────────────────────────────────

/// Lightweight projection of a post for list and feed rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
  /// Join key into post detail lookup. Posts without one cannot be opened.
  pub id:        Option<String>,
  pub person_id: String,
  /// Locator of the detail document in the static source. Irregular on
  /// purpose, so it is never derived from `id`.
  pub file:      Option<String>,
  pub title:     String,
  pub summary:   String,
  pub tags:      Vec<String>,
  pub likes:     u64,
  pub comments:  u64,
  /// Used for recency sorting and windowing; `None` sorts as the epoch.
  pub date:      Option<DateTime<Utc>>,
}

impl PostSummary {
  pub fn is_available(&self) -> bool { !self.title.trim().is_empty() }
}

// ─── PostDetail ──────────────────────────────────────────────────────────────

/// Contextual metadata shown under a post title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
  pub university: String,
  pub location:   String,
  pub created_at: Option<DateTime<Utc>>,
}

/// A typed content block. Only paragraphs are rendered today; every other
/// kind deserializes to [`ContentBlock::Unsupported`] and is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
  #[serde(rename = "p")]
  Paragraph {
    #[serde(default, deserialize_with = "null_as_empty")]
    text: String,
  },
  #[serde(other)]
  Unsupported,
}

/// An image attached to a post; shown after the content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
  pub src: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub alt: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// Full content for a single post, fetched lazily on navigation and never
/// cached beyond the current detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
  pub id:      String,
  pub title:   String,
  pub meta:    PostMeta,
  pub content: Vec<ContentBlock>,
  pub images:  Vec<ImageRef>,
}

impl PostDetail {
  /// Text of every renderable paragraph, in order.
  pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
    self.content.iter().filter_map(|block| match block {
      ContentBlock::Paragraph { text } => Some(text.as_str()),
      ContentBlock::Unsupported => None,
    })
  }
}
