//! Query-string synchronisation for [`FilterState`].
//!
//! Pages are reachable at a listing route with an optional `?q=<text>`
//! parameter that seeds the initial search. A full filter state can also be
//! written back to (and read from) a query string using one repeated key per
//! dimension:
//!
//! | Key | Dimension |
//! |-----|-----------|
//! | `q` | search text |
//! | `subject` | subject, by name |
//! | `subject_id` | subject, by id |
//! | `type` | canonical kind |
//! | `semester` | semester number |
//!
//! Unknown keys and unparsable values are ignored.

use std::str::FromStr as _;

use url::form_urlencoded;
use uuid::Uuid;

use crate::{
  filter::{FilterState, SubjectKey},
  resource::{ResourceKind, Semester},
};

pub const SEARCH_KEY: &str = "q";
pub const SUBJECT_KEY: &str = "subject";
pub const SUBJECT_ID_KEY: &str = "subject_id";
pub const KIND_KEY: &str = "type";
pub const SEMESTER_KEY: &str = "semester";

/// The query component of `raw`, which may be a bare query (`q=x`), a query
/// with its leading `?`, or a whole link (`/resources?q=x#top`).
///
/// A `?` only separates a path from its query when it comes before the first
/// `=` or `&`; later ones belong to a value.
fn query_component(raw: &str) -> &str {
  let head = raw.split_once('#').map_or(raw, |(head, _)| head);
  let path_end = head.find(['=', '&']).unwrap_or(head.len());
  match head[..path_end].find('?') {
    Some(i) => &head[i + 1..],
    None if path_end < head.len() => head,
    None => "",
  }
}

/// The initial search text for a page load: the decoded `q` parameter, or an
/// empty string when it is absent.
pub fn seed_from_query(raw: Option<&str>) -> String {
  let Some(raw) = raw else {
    return String::new();
  };
  form_urlencoded::parse(query_component(raw).as_bytes())
    .find(|(k, _)| k == SEARCH_KEY)
    .map(|(_, v)| v.into_owned())
    .unwrap_or_default()
}

impl FilterState {
  /// Encode every active dimension. Equal states encode identically.
  pub fn to_query_string(&self) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    if !self.search_text.is_empty() {
      out.append_pair(SEARCH_KEY, &self.search_text);
    }
    for key in &self.selected_subjects {
      match key {
        SubjectKey::Name(name) => out.append_pair(SUBJECT_KEY, name),
        SubjectKey::Id(id) => out.append_pair(SUBJECT_ID_KEY, &id.to_string()),
      };
    }
    for kind in &self.selected_kinds {
      out.append_pair(KIND_KEY, kind.as_ref());
    }
    for semester in &self.selected_semesters {
      out.append_pair(SEMESTER_KEY, &semester.to_string());
    }
    out.finish()
  }

  /// Decode a state written by [`Self::to_query_string`]; key order does not
  /// matter.
  pub fn from_query_string(raw: &str) -> Self {
    let mut state = FilterState {
      search_text: seed_from_query(Some(raw)),
      ..FilterState::default()
    };

    for (key, value) in form_urlencoded::parse(query_component(raw).as_bytes()) {
      match &*key {
        SUBJECT_KEY if !value.is_empty() => {
          state.selected_subjects.insert(SubjectKey::Name(value.into_owned()));
        }
        SUBJECT_ID_KEY => {
          if let Ok(id) = Uuid::parse_str(&value) {
            state.selected_subjects.insert(SubjectKey::Id(id));
          }
        }
        KIND_KEY => {
          if let Ok(kind) = ResourceKind::from_str(&value.to_lowercase()) {
            state.selected_kinds.insert(kind);
          }
        }
        SEMESTER_KEY => {
          if let Some(s) = value.parse().ok().and_then(|n| Semester::new(n).ok()) {
            state.selected_semesters.insert(s);
          }
        }
        _ => {}
      }
    }

    state
  }
}
