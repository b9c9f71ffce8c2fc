//! The loaded directory and the projections derived from it.
//!
//! A [`Directory`] is built once from a [`PeopleDocument`] and never mutated.
//! The facet lists and the post index are recomputed from the people
//! collection at construction time, so they cannot drift from it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::person::Person;

// ─── Source document ─────────────────────────────────────────────────────────

/// What a data source hands back: normalized people plus any facet lists the
/// source declares up front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleDocument {
  pub people:       Vec<Person>,
  #[serde(default)]
  pub regions:      Vec<String>,
  #[serde(default)]
  pub universities: Vec<String>,
}

// ─── Post index ──────────────────────────────────────────────────────────────

/// Where the detail record for a post lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
  pub id:   String,
  /// Static-source file name; `None` for sources that look posts up by id.
  pub file: Option<String>,
}

impl PostRef {
  /// A reference carrying only the id.
  pub fn by_id(id: impl Into<String>) -> Self {
    Self { id: id.into(), file: None }
  }
}

/// Map from post identifier to its location, drawn only from the people
/// collection.
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
  by_id: HashMap<String, PostRef>,
}

impl PostIndex {
  pub fn build(people: &[Person]) -> Self {
    let by_id = people
      .iter()
      .filter_map(|person| person.post.as_ref())
      .filter_map(|post| {
        let id = post.id.clone()?;
        Some((id.clone(), PostRef { id, file: post.file.clone() }))
      })
      .collect();
    Self { by_id }
  }

  pub fn get(&self, post_id: &str) -> Option<&PostRef> { self.by_id.get(post_id) }

  pub fn contains(&self, post_id: &str) -> bool { self.by_id.contains_key(post_id) }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }
}

// ─── Facets ──────────────────────────────────────────────────────────────────

/// Distinct locations and universities, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
  pub regions:      Vec<String>,
  pub universities: Vec<String>,
}

/// Distinct, non-empty, insertion-ordered `location` and `university` values
/// across `people`.
pub fn facets(people: &[Person]) -> Facets {
  Facets {
    regions:      distinct(people.iter().map(|p| p.location.as_str())),
    universities: distinct(people.iter().map(|p| p.university.as_str())),
  }
}

/// De-duplicate `values` keeping first occurrences; blank values are dropped.
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
  let mut seen = HashSet::new();
  values
    .into_iter()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .filter(|v| seen.insert(*v))
    .map(str::to_owned)
    .collect()
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// The full in-memory people collection plus its derived projections.
#[derive(Debug, Clone, Default)]
pub struct Directory {
  pub people:       Vec<Person>,
  /// Declared regions first, then any observed on people.
  pub regions:      Vec<String>,
  /// Declared universities first, then any observed on people.
  pub universities: Vec<String>,
  pub posts:        PostIndex,
}

impl Directory {
  pub fn from_document(doc: PeopleDocument) -> Self {
    let observed = facets(&doc.people);
    let regions = distinct(
      doc.regions.iter().chain(&observed.regions).map(String::as_str),
    );
    let universities = distinct(
      doc
        .universities
        .iter()
        .chain(&observed.universities)
        .map(String::as_str),
    );
    let posts = PostIndex::build(&doc.people);

    Self { people: doc.people, regions, universities, posts }
  }

  pub fn person(&self, id: &str) -> Option<&Person> {
    self.people.iter().find(|p| p.id == id)
  }

  /// Distinct genders, for populating the search form.
  pub fn genders(&self) -> Vec<String> {
    distinct(self.people.iter().map(|p| p.gender.as_str()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::PostSummary;

  fn person(id: &str, location: &str, university: &str) -> Person {
    Person {
      id:             id.into(),
      name_cn:        format!("name {id}"),
      name_en:        format!("Name {id}"),
      gender:         "F".into(),
      location:       location.into(),
      university:     university.into(),
      incidents:      0,
      last_report_at: None,
      post:           None,
    }
  }

  #[test]
  fn facets_are_distinct_ordered_and_skip_blanks() {
    let people = vec![
      person("1", "Toronto", "UofT"),
      person("2", "", "McGill"),
      person("3", "Montreal", "UofT"),
      person("4", "Toronto", ""),
    ];
    let f = facets(&people);
    assert_eq!(f.regions, ["Toronto", "Montreal"]);
    assert_eq!(f.universities, ["UofT", "McGill"]);
  }

  #[test]
  fn declared_facets_come_before_observed_ones() {
    let doc = PeopleDocument {
      people:       vec![person("1", "Toronto", "UofT"), person("2", "Ottawa", "UofT")],
      regions:      vec!["Ottawa".into(), "Calgary".into()],
      universities: vec![],
    };
    let dir = Directory::from_document(doc);
    assert_eq!(dir.regions, ["Ottawa", "Calgary", "Toronto"]);
    assert_eq!(dir.universities, ["UofT"]);
  }

  #[test]
  fn post_index_only_holds_posts_with_ids() {
    let mut with_post = person("1", "A", "B");
    with_post.post = Some(PostSummary {
      id:        Some("p-1".into()),
      person_id: "1".into(),
      file:      Some("x9f2.json".into()),
      title:     "t".into(),
      summary:   String::new(),
      tags:      vec![],
      likes:     0,
      comments:  0,
      date:      None,
    });
    let mut anonymous_post = person("2", "A", "B");
    anonymous_post.post = with_post.post.clone().map(|mut p| {
      p.id = None;
      p
    });

    let index = PostIndex::build(&[with_post, anonymous_post, person("3", "A", "B")]);
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("p-1").and_then(|r| r.file.as_deref()), Some("x9f2.json"));
  }
}
