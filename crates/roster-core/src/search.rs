//! Keyword and facet search over the people collection.

use serde::{Deserialize, Serialize};

use crate::person::Person;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Search form state. Every field may be empty, which disables that filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
  /// Case-insensitive substring over names, university and post text.
  pub keyword:    String,
  pub gender:     String,
  pub location:   String,
  pub university: String,
}

/// What an empty keyword means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPolicy {
  /// Nothing is listed until a keyword is typed.
  #[default]
  Required,
  /// An empty keyword matches everyone the other filters let through.
  Optional,
}

/// Result of [`filter_people`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
  /// The policy requires a keyword and none was given.
  AwaitingInput,
  /// Records that passed every filter, in collection order. May be empty.
  Matches(Vec<&'a Person>),
}

impl<'a> SearchOutcome<'a> {
  pub fn matches(&self) -> &[&'a Person] {
    match self {
      Self::AwaitingInput => &[],
      Self::Matches(rows) => rows,
    }
  }
}

// ─── Matching ────────────────────────────────────────────────────────────────

impl SearchFilter {
  /// Whether `person` passes every non-empty filter. The keyword must already
  /// be trimmed and lowercased.
  fn accepts(&self, person: &Person, keyword: &str) -> bool {
    let post = person.post.as_ref();
    let corpus = [
      Some(person.name_cn.as_str()),
      Some(person.name_en.as_str()),
      Some(person.university.as_str()),
      post.map(|p| p.title.as_str()),
      post.map(|p| p.summary.as_str()),
    ];

    let keyword_ok = keyword.is_empty()
      || corpus
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(keyword));

    keyword_ok
      && facet_ok(&self.gender, &person.gender)
      && facet_ok(&self.location, &person.location)
      && facet_ok(&self.university, &person.university)
  }
}

fn facet_ok(wanted: &str, actual: &str) -> bool { wanted.is_empty() || wanted == actual }

/// Apply `filter` to `people` under `policy`.
pub fn filter_people<'a>(
  people: &'a [Person],
  filter: &SearchFilter,
  policy: KeywordPolicy,
) -> SearchOutcome<'a> {
  let keyword = filter.keyword.trim().to_lowercase();
  if keyword.is_empty() && policy == KeywordPolicy::Required {
    return SearchOutcome::AwaitingInput;
  }

  SearchOutcome::Matches(
    people.iter().filter(|p| filter.accepts(p, &keyword)).collect(),
  )
}
