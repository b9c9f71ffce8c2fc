//! Wire shapes and their normalization into `roster_core` types.
//!
//! Both backends deliver loosely typed records: ids may be strings or
//! numbers, counts may be missing, and a person's post may be laid out flat
//! on the person or nested under `post`. Everything is reconciled here so
//! downstream code only ever sees [`Person`] and [`PostDetail`].
//!
//! Lists are decoded element by element. A malformed person, content block
//! or image is dropped on its own and never fails the surrounding document.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use roster_core::{
  directory::PeopleDocument,
  person::{ContentBlock, ImageRef, Person, PostDetail, PostMeta, PostSummary},
};
use serde::Deserialize;
use serde_json::Value;

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// An identifier sent as either a JSON string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
  Text(String),
  Number(serde_json::Number),
}

impl RawId {
  fn into_string(self) -> Option<String> {
    let s = match self {
      Self::Text(s) => s.trim().to_owned(),
      Self::Number(n) => n.to_string(),
    };
    (!s.is_empty()).then_some(s)
  }
}

/// A non-negative count sent as an integer, a float or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
  Int(u64),
  Float(f64),
  Text(String),
}

impl RawCount {
  fn value(&self) -> u64 {
    match self {
      Self::Int(n) => *n,
      Self::Float(f) if f.is_finite() && *f > 0.0 => *f as u64,
      Self::Float(_) => 0,
      Self::Text(s) => s.trim().parse().unwrap_or(0),
    }
  }
}

fn count(raw: Option<&RawCount>) -> u64 { raw.map(RawCount::value).unwrap_or(0) }

/// Parse the date formats the backends emit. Unparseable values are `None`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
      return Some(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

fn non_empty(s: &Option<String>) -> Option<&str> {
  s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn text(s: Option<String>) -> String { s.map(|s| s.trim().to_owned()).unwrap_or_default() }

/// Keep the string elements of a tag list, dropping anything else.
fn tag_list(raw: &Option<Vec<Value>>) -> Option<Vec<String>> {
  raw.as_ref().map(|values| {
    values
      .iter()
      .filter_map(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect()
  })
}

// ─── People ──────────────────────────────────────────────────────────────────

/// A post nested under `person.post`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
  pub id:       Option<RawId>,
  pub file:     Option<String>,
  pub title:    Option<String>,
  pub summary:  Option<String>,
  pub tags:     Option<Vec<Value>>,
  pub likes:    Option<RawCount>,
  pub comments: Option<RawCount>,
  pub date:     Option<String>,
}

/// One person as sent by either backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPerson {
  pub id:             Option<RawId>,
  pub name_cn:        Option<String>,
  pub name_en:        Option<String>,
  pub gender:         Option<String>,
  pub location:       Option<String>,
  pub university:     Option<String>,
  pub incidents:      Option<RawCount>,
  pub last_report_at: Option<String>,

  // Flat post layout.
  pub post_id:  Option<RawId>,
  pub file:     Option<String>,
  pub title:    Option<String>,
  pub summary:  Option<String>,
  pub tags:     Option<Vec<Value>>,
  pub likes:    Option<RawCount>,
  pub comments: Option<RawCount>,
  pub date:     Option<String>,

  // Nested post layout.
  pub post: Option<RawPost>,
}

impl RawPerson {
  fn has_flat_post(&self) -> bool {
    non_empty(&self.title).is_some()
      || non_empty(&self.summary).is_some()
      || non_empty(&self.file).is_some()
      || self.post_id.is_some()
  }

  /// Merge the flat and nested layouts. Flat fields win field by field; the
  /// nested object fills the gaps. The date falls back to `last_report_at`.
  fn post_summary(&self, person_id: &str) -> Option<PostSummary> {
    if !self.has_flat_post() && self.post.is_none() {
      return None;
    }
    let nested = self.post.clone().unwrap_or_default();
    let pick = |flat: &Option<String>, nested: &Option<String>| {
      non_empty(flat).or(non_empty(nested)).map(str::to_owned)
    };
    let pick_count = |flat: Option<&RawCount>, nested: Option<&RawCount>| {
      let flat = count(flat);
      if flat > 0 { flat } else { count(nested) }
    };

    let date = non_empty(&self.date)
      .or(non_empty(&nested.date))
      .or(non_empty(&self.last_report_at))
      .and_then(parse_date);

    Some(PostSummary {
      id: self
        .post_id
        .clone()
        .and_then(RawId::into_string)
        .or_else(|| nested.id.clone().and_then(RawId::into_string)),
      person_id: person_id.to_owned(),
      file: pick(&self.file, &nested.file),
      title: pick(&self.title, &nested.title).unwrap_or_default(),
      summary: pick(&self.summary, &nested.summary).unwrap_or_default(),
      tags: tag_list(&self.tags)
        .filter(|t| !t.is_empty())
        .or_else(|| tag_list(&nested.tags))
        .unwrap_or_default(),
      likes: pick_count(self.likes.as_ref(), nested.likes.as_ref()),
      comments: pick_count(self.comments.as_ref(), nested.comments.as_ref()),
      date,
    })
  }

  /// Normalize into a [`Person`]; `None` when the record has no id.
  pub fn into_person(self) -> Option<Person> {
    let id = self.id.clone().and_then(RawId::into_string)?;
    let post = self.post_summary(&id);
    Some(Person {
      last_report_at: non_empty(&self.last_report_at).and_then(parse_date),
      incidents: u32::try_from(count(self.incidents.as_ref())).unwrap_or(u32::MAX),
      name_cn: text(self.name_cn),
      name_en: text(self.name_en),
      gender: text(self.gender),
      location: text(self.location),
      university: text(self.university),
      post,
      id,
    })
  }
}

/// Normalize a batch of people records. Records that do not decode, have
/// no id, or repeat an id already seen are dropped.
pub fn normalize_people(raw: Vec<Value>) -> Vec<Person> {
  let mut seen = HashSet::new();
  raw
    .into_iter()
    .filter_map(|value| match serde_json::from_value::<RawPerson>(value) {
      Ok(record) => Some(record),
      Err(e) => {
        tracing::warn!(error = %e, "skipping malformed person record");
        None
      }
    })
    .filter_map(|r| {
      let person = r.into_person();
      if person.is_none() {
        tracing::warn!("skipping person record without an id");
      }
      person
    })
    .filter(|p| {
      let fresh = seen.insert(p.id.clone());
      if !fresh {
        tracing::warn!(id = %p.id, "skipping duplicate person id");
      }
      fresh
    })
    .collect()
}

/// The static `index.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIndex {
  #[serde(default)]
  pub people:       Vec<Value>,
  #[serde(default)]
  pub regions:      Vec<String>,
  #[serde(default)]
  pub universities: Vec<String>,
}

impl RawIndex {
  pub fn into_document(self) -> PeopleDocument {
    PeopleDocument {
      people:       normalize_people(self.people),
      regions:      self.regions,
      universities: self.universities,
    }
  }
}

// ─── Post detail ─────────────────────────────────────────────────────────────

/// `meta` in static documents, or the `people(...)` join in remote rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
  pub university: Option<String>,
  pub location:   Option<String>,
  pub created_at: Option<String>,
}

/// One post detail record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPostDetail {
  pub id:         Option<RawId>,
  pub title:      Option<String>,
  pub meta:       Option<RawMeta>,
  pub people:     Option<RawMeta>,
  pub created_at: Option<String>,
  pub content:    Option<Vec<Value>>,
  pub images:     Option<Vec<Value>>,
  /// Moderation state, when the backend exposes it.
  pub status:     Option<String>,
}

/// Moderation status a record must carry, if it carries one at all.
pub const APPROVED: &str = "approved";

impl RawPostDetail {
  /// Normalize for `requested_id`. Records that declare a status other than
  /// approved come back as `None`, exactly like absent records.
  pub fn into_detail(self, requested_id: &str) -> Option<PostDetail> {
    if let Some(status) = non_empty(&self.status)
      && !status.eq_ignore_ascii_case(APPROVED)
    {
      return None;
    }

    let meta = self.meta.or(self.people).unwrap_or_default();
    let created_at = non_empty(&meta.created_at)
      .or(non_empty(&self.created_at))
      .and_then(parse_date);

    Some(PostDetail {
      id: self
        .id
        .and_then(RawId::into_string)
        .unwrap_or_else(|| requested_id.to_owned()),
      title: text(self.title),
      meta: PostMeta {
        university: text(meta.university),
        location: text(meta.location),
        created_at,
      },
      content: self.content.unwrap_or_default().into_iter().map(content_block).collect(),
      images: self.images.unwrap_or_default().into_iter().filter_map(image).collect(),
    })
  }
}

#[derive(Debug, Deserialize)]
struct RawBlock {
  #[serde(rename = "type")]
  kind: Option<String>,
  text: Option<String>,
}

/// Paragraphs keep their text; anything else, including blocks that do not
/// decode, becomes [`ContentBlock::Unsupported`].
fn content_block(value: Value) -> ContentBlock {
  match serde_json::from_value::<RawBlock>(value) {
    Ok(RawBlock { kind: Some(kind), text }) if kind == "p" => {
      ContentBlock::Paragraph { text: text.unwrap_or_default() }
    }
    _ => ContentBlock::Unsupported,
  }
}

#[derive(Debug, Deserialize)]
struct RawImage {
  src: Option<String>,
  alt: Option<String>,
}

/// An image needs a source; without one it is dropped.
fn image(value: Value) -> Option<ImageRef> {
  let raw = match serde_json::from_value::<RawImage>(value) {
    Ok(raw) => raw,
    Err(e) => {
      tracing::debug!(error = %e, "skipping malformed image");
      return None;
    }
  };
  let src = non_empty(&raw.src)?.to_owned();
  Some(ImageRef { src, alt: text(raw.alt) })
}
