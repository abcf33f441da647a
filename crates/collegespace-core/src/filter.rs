//! The filter predicate engine.
//!
//! A [`FilterState`] narrows a resource list along four independent
//! dimensions: search text, subject, kind and semester. Dimensions combine
//! with AND; selections within one dimension combine with OR. An empty
//! selection never filters anything out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::{ResourceKind, ResourceRecord, Semester};

// ─── Subject key ─────────────────────────────────────────────────────────────

/// How a subject selection identifies its subject.
///
/// Ids are preferred; names stay supported so links that were built from
/// subject names keep resolving.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum SubjectKey {
  Id(Uuid),
  Name(String),
}

impl SubjectKey {
  /// The key a record groups under: its subject id when known, else its name.
  pub fn of(record: &ResourceRecord) -> Self {
    match record.subject_id {
      Some(id) => Self::Id(id),
      None => Self::Name(record.subject.clone()),
    }
  }

  pub fn matches(&self, record: &ResourceRecord) -> bool {
    match self {
      Self::Id(id) => record.subject_id == Some(*id),
      Self::Name(name) => record.subject == *name,
    }
  }
}

impl From<Uuid> for SubjectKey {
  fn from(id: Uuid) -> Self { Self::Id(id) }
}

impl From<&str> for SubjectKey {
  fn from(name: &str) -> Self { Self::Name(name.to_owned()) }
}

impl From<String> for SubjectKey {
  fn from(name: String) -> Self { Self::Name(name) }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// The user's current query intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
  /// Stored verbatim; trimmed only when matching.
  #[serde(default)]
  pub search_text:        String,
  #[serde(default)]
  pub selected_subjects:  BTreeSet<SubjectKey>,
  #[serde(default)]
  pub selected_kinds:     BTreeSet<ResourceKind>,
  #[serde(default)]
  pub selected_semesters: BTreeSet<Semester>,
}

impl FilterState {
  pub fn with_search(mut self, text: impl Into<String>) -> Self {
    self.search_text = text.into();
    self
  }

  pub fn with_subject(mut self, key: impl Into<SubjectKey>) -> Self {
    self.selected_subjects.insert(key.into());
    self
  }

  pub fn with_kind(mut self, kind: ResourceKind) -> Self {
    self.selected_kinds.insert(kind);
    self
  }

  pub fn with_semester(mut self, semester: Semester) -> Self {
    self.selected_semesters.insert(semester);
    self
  }

  /// `true` when no dimension is active, i.e. filtering is the identity.
  pub fn is_inactive(&self) -> bool {
    self.search_text.trim().is_empty()
      && self.selected_subjects.is_empty()
      && self.selected_kinds.is_empty()
      && self.selected_semesters.is_empty()
  }

  /// Build a reusable predicate; the search needle is lower-cased once.
  pub fn predicate(&self) -> Predicate<'_> {
    let needle = self.search_text.trim().to_lowercase();
    Predicate { state: self, needle }
  }

  pub fn matches(&self, record: &ResourceRecord) -> bool {
    self.predicate().matches(record)
  }
}

/// A [`FilterState`] prepared for matching many records.
pub struct Predicate<'a> {
  state:  &'a FilterState,
  needle: String,
}

impl Predicate<'_> {
  pub fn matches(&self, record: &ResourceRecord) -> bool {
    self.matches_search(record)
      && (self.state.selected_subjects.is_empty()
        || self.state.selected_subjects.iter().any(|k| k.matches(record)))
      && (self.state.selected_kinds.is_empty()
        || self.state.selected_kinds.contains(&record.kind))
      && (self.state.selected_semesters.is_empty()
        || self.state.selected_semesters.contains(&record.semester))
  }

  fn matches_search(&self, record: &ResourceRecord) -> bool {
    if self.needle.is_empty() {
      return true;
    }
    record.title.to_lowercase().contains(&self.needle)
      || record.subject.to_lowercase().contains(&self.needle)
      || record
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(&self.needle))
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Positions in `records` of every record that satisfies `state`, ascending.
pub fn matching_indices(
  records: &[ResourceRecord],
  state: &FilterState,
) -> Vec<usize> {
  let predicate = state.predicate();
  records
    .iter()
    .enumerate()
    .filter(|(_, r)| predicate.matches(r))
    .map(|(i, _)| i)
    .collect()
}

/// The ordered sub-list of `records` that satisfies `state`.
///
/// Pure: `records` is never mutated and relative order is preserved.
pub fn filter(records: &[ResourceRecord], state: &FilterState) -> Vec<ResourceRecord> {
  let predicate = state.predicate();
  records
    .iter()
    .filter(|r| predicate.matches(r))
    .cloned()
    .collect()
}

// ─── Facets ──────────────────────────────────────────────────────────────────

/// One subject option with the number of records filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFacet {
  pub key:   SubjectKey,
  pub name:  String,
  pub count: usize,
}

/// Filter options actually present in a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
  /// In order of first appearance.
  pub subjects:  Vec<SubjectFacet>,
  /// Ascending.
  pub semesters: Vec<Semester>,
}

impl Facets {
  pub fn from_records<'a>(
    records: impl IntoIterator<Item = &'a ResourceRecord>,
  ) -> Self {
    let mut subjects: Vec<SubjectFacet> = Vec::new();
    let mut semesters = BTreeSet::new();

    for record in records {
      semesters.insert(record.semester);
      let key = SubjectKey::of(record);
      match subjects.iter_mut().find(|f| f.key == key) {
        Some(facet) => facet.count += 1,
        None => subjects.push(SubjectFacet {
          key,
          name: record.subject.clone(),
          count: 1,
        }),
      }
    }

    Self { subjects, semesters: semesters.into_iter().collect() }
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One filtered listing: the matching records plus the facets of the whole
/// scoped list they were drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePage {
  pub items:  Vec<ResourceRecord>,
  pub facets: Facets,
  pub total:  usize,
}

impl ResourcePage {
  pub fn build(records: &[ResourceRecord], state: &FilterState) -> Self {
    let items = filter(records, state);
    Self { total: items.len(), facets: Facets::from_records(records), items }
  }
}
