//! [`FilterController`]: the page-level owner of a [`FilterState`] and the
//! resource list it filters.
//!
//! Every mutation recomputes the visible view synchronously, so the view can
//! never disagree with the state. The controller performs no I/O; callers
//! fetch records themselves and hand them over, guarded by [`FetchTicket`]s
//! so that a slow response for an outdated scope cannot overwrite a newer one.

use std::collections::BTreeSet;

use crate::{
  filter::{FilterState, SubjectKey, matching_indices},
  resource::{ResourceKind, ResourceRecord, Semester},
};

/// Identifies one fetch issued through [`FilterController::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
pub struct FilterController {
  source:     Vec<ResourceRecord>,
  state:      FilterState,
  /// Indices into `source` of the records that pass `state`.
  visible:    Vec<usize>,
  generation: u64,
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
  if !set.remove(&value) {
    set.insert(value);
  }
}

impl FilterController {
  pub fn new() -> Self { Self::default() }

  /// A controller restored from an inbound link or query string. The search
  /// text is seeded from `q` (see
  /// [`seed_from_query`](crate::query::seed_from_query)); the other dimensions
  /// come from a written-back filter state, when present.
  pub fn restored(raw_query: &str) -> Self {
    let mut controller = Self::new();
    controller.state = FilterState::from_query_string(raw_query);
    controller.recompute();
    controller
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn state(&self) -> &FilterState { &self.state }

  pub fn source(&self) -> &[ResourceRecord] { &self.source }

  /// The filtered view, in source order.
  pub fn visible(&self) -> impl ExactSizeIterator<Item = &ResourceRecord> + '_ {
    self.visible.iter().map(|&i| &self.source[i])
  }

  pub fn visible_len(&self) -> usize { self.visible.len() }

  /// The `n`th record of the filtered view.
  pub fn visible_at(&self, n: usize) -> Option<&ResourceRecord> {
    self.visible.get(n).map(|&i| &self.source[i])
  }

  /// `true` when there is nothing to show, whether because the source is
  /// empty or because nothing matches.
  pub fn is_empty(&self) -> bool { self.visible.is_empty() }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Replace the search text verbatim; trimming happens when matching.
  pub fn set_search_text(&mut self, text: impl Into<String>) {
    self.state.search_text = text.into();
    self.recompute();
  }

  pub fn toggle_subject(&mut self, key: impl Into<SubjectKey>) {
    toggle(&mut self.state.selected_subjects, key.into());
    self.recompute();
  }

  pub fn toggle_kind(&mut self, kind: ResourceKind) {
    toggle(&mut self.state.selected_kinds, kind);
    self.recompute();
  }

  pub fn toggle_semester(&mut self, semester: Semester) {
    toggle(&mut self.state.selected_semesters, semester);
    self.recompute();
  }

  /// Clear every dimension; the view becomes the full source list.
  pub fn reset(&mut self) {
    self.state = FilterState::default();
    self.recompute();
  }

  /// Replace the backing list.
  pub fn set_source_list(&mut self, records: Vec<ResourceRecord>) {
    self.source = records;
    self.recompute();
  }

  // ── Fetch guarding ────────────────────────────────────────────────────────

  /// Start a fetch; any ticket issued earlier becomes stale.
  pub fn begin_fetch(&mut self) -> FetchTicket {
    self.generation += 1;
    FetchTicket(self.generation)
  }

  pub fn is_current(&self, ticket: FetchTicket) -> bool {
    ticket.0 == self.generation
  }

  /// Apply the result of the fetch identified by `ticket`.
  ///
  /// Returns `false`, leaving the controller untouched, when a newer fetch has
  /// been started since.
  pub fn complete_fetch(
    &mut self,
    ticket: FetchTicket,
    records: Vec<ResourceRecord>,
  ) -> bool {
    if !self.is_current(ticket) {
      return false;
    }
    self.set_source_list(records);
    true
  }

  fn recompute(&mut self) {
    self.visible = matching_indices(&self.source, &self.state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    filter::filter,
    sample::{sample_records, sem},
  };

  fn loaded() -> FilterController {
    let mut c = FilterController::new();
    c.set_source_list(sample_records());
    c
  }

  fn visible_titles(c: &FilterController) -> Vec<String> {
    c.visible().map(|r| r.title.clone()).collect()
  }

  #[test]
  fn fresh_controller_shows_everything() {
    let c = loaded();
    assert_eq!(c.visible_len(), 12);
    assert_eq!(c.visible().cloned().collect::<Vec<_>>(), sample_records());
  }

  #[test]
  fn empty_source_is_tolerated() {
    let mut c = FilterController::new();
    c.toggle_semester(sem(2));
    c.set_search_text("anything");
    assert!(c.is_empty());
    assert!(c.visible_at(0).is_none());
  }

  #[test]
  fn toggles_are_symmetric() {
    let mut c = loaded();
    c.toggle_subject("Electronics");
    assert_eq!(c.visible_len(), 3);
    c.toggle_subject("Electronics");
    assert!(c.state().selected_subjects.is_empty());
    assert_eq!(c.visible_len(), 12);

    c.toggle_kind(ResourceKind::Book);
    assert_eq!(c.visible_len(), 3);
    c.toggle_kind(ResourceKind::Book);
    assert_eq!(c.visible_len(), 12);

    c.toggle_semester(sem(3));
    assert_eq!(c.visible_len(), 3);
    c.toggle_semester(sem(3));
    assert_eq!(c.visible_len(), 12);
  }

  #[test]
  fn search_text_is_stored_verbatim() {
    let mut c = loaded();
    c.set_search_text("  Fluid ");
    assert_eq!(c.state().search_text, "  Fluid ");
    assert_eq!(visible_titles(&c), vec!["Fluid Mechanics Textbook Solutions"]);
  }

  #[test]
  fn reset_restores_full_list() {
    let mut c = loaded();
    c.set_search_text("notes");
    c.toggle_subject("Computer Science");
    c.toggle_kind(ResourceKind::Notes);
    c.toggle_semester(sem(4));
    assert_eq!(visible_titles(&c), vec![
      "Database Management Systems Comprehensive Notes"
    ]);

    c.reset();
    assert_eq!(c.state(), &FilterState::default());
    assert_eq!(c.visible().cloned().collect::<Vec<_>>(), sample_records());
  }

  #[test]
  fn replacing_source_recomputes_with_current_state() {
    let mut c = FilterController::new();
    c.toggle_kind(ResourceKind::Paper);
    assert!(c.is_empty());
    c.set_source_list(sample_records());
    assert_eq!(c.visible_len(), 4);
    assert!(c.visible().all(|r| r.kind == ResourceKind::Paper));
  }

  #[test]
  fn seeding_from_link() {
    let mut c = FilterController::restored("?q=Digital%20Electronics");
    assert_eq!(c.state().search_text, "Digital Electronics");
    c.set_source_list(sample_records());

    let expected = filter(
      &sample_records(),
      &FilterState::default().with_search("Digital Electronics"),
    );
    assert_eq!(c.visible().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(visible_titles(&c), vec!["Digital Electronics Complete Notes"]);
  }

  #[test]
  fn seeding_without_query_leaves_search_empty() {
    let c = FilterController::restored("/resources");
    assert_eq!(c.state(), &FilterState::default());
  }

  #[test]
  fn restoring_a_written_back_state() {
    let mut original = loaded();
    original.toggle_kind(ResourceKind::Paper);
    original.toggle_semester(sem(3));
    original.toggle_semester(sem(4));

    let link = format!("/resources?{}", original.state().to_query_string());
    let mut restored = FilterController::restored(&link);
    restored.set_source_list(sample_records());

    assert_eq!(restored.state(), original.state());
    assert_eq!(visible_titles(&restored), visible_titles(&original));
  }

  #[test]
  fn stale_fetch_is_discarded() {
    let mut c = FilterController::new();
    let first = c.begin_fetch();
    let second = c.begin_fetch();

    let mut newer = sample_records();
    newer.truncate(2);
    assert!(c.complete_fetch(second, newer));
    assert_eq!(c.visible_len(), 2);

    // The earlier, slower response arrives last and must not win.
    assert!(!c.complete_fetch(first, sample_records()));
    assert_eq!(c.visible_len(), 2);
    assert!(!c.is_current(first));
    assert!(c.is_current(second));
  }
}
