//! Resource types: the study artefacts (notes, papers, books) the portal
//! lists, filters and serves.
//!
//! Storage backends hand rows over as [`RawResourceRow`]; the validating
//! [`RawResourceRow::into_record`] step is the only way a [`ResourceRecord`]
//! is built from persisted data, so everything downstream of the gateway sees
//! the canonical shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator as _};
use url::Url;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Semester ────────────────────────────────────────────────────────────────

/// A semester number, always within `1..=8`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Semester(u8);

impl Semester {
  pub const FIRST: u8 = 1;
  pub const LAST: u8 = 8;

  pub fn new(n: u8) -> Result<Self> {
    if (Self::FIRST..=Self::LAST).contains(&n) {
      Ok(Self(n))
    } else {
      Err(Error::InvalidSemester(i64::from(n)))
    }
  }

  /// Validate a wider integer, e.g. an SQLite `INTEGER` column.
  pub fn from_i64(n: i64) -> Result<Self> {
    u8::try_from(n)
      .map_err(|_| Error::InvalidSemester(n))
      .and_then(Self::new)
  }

  pub fn get(self) -> u8 { self.0 }

  /// Every semester in ascending order; filter UIs enumerate exactly these.
  pub fn all() -> impl Iterator<Item = Semester> {
    (Self::FIRST..=Self::LAST).map(Semester)
  }
}

impl TryFrom<u8> for Semester {
  type Error = Error;

  fn try_from(n: u8) -> Result<Self> { Self::new(n) }
}

impl From<Semester> for u8 {
  fn from(s: Semester) -> u8 { s.0 }
}

impl fmt::Display for Semester {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The three kinds of resource the portal distinguishes, whatever vocabulary
/// the store uses for them.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
  Notes,
  Paper,
  Book,
}

impl ResourceKind {
  /// Map a raw storage type onto the canonical kind.
  ///
  /// Total: anything outside the lookup table is treated as notes.
  pub fn canonicalize(raw: &str) -> Self {
    match raw.to_lowercase().as_str() {
      "pdf" | "notes" => Self::Notes,
      "paper" | "question_paper" => Self::Paper,
      "book" | "solution" => Self::Book,
      _ => Self::Notes,
    }
  }

  pub fn all() -> impl Iterator<Item = ResourceKind> { Self::iter() }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One downloadable or viewable study artefact in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
  pub id:          Uuid,
  pub title:       String,
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind:        ResourceKind,
  /// Subject display name.
  pub subject:     String,
  /// Stable subject identifier, when the source knows it.
  pub subject_id:  Option<Uuid>,
  pub semester:    Semester,
  pub uploaded_at: DateTime<Utc>,
  /// Absolute URL of the underlying file.
  pub file_url:    Option<String>,
  pub view_count:  u64,
}

impl ResourceRecord {
  /// Relative upload time for display, e.g. `"2 days ago"`.
  ///
  /// Timestamps in the future render as if uploaded just now.
  pub fn uploaded_ago(&self, now: DateTime<Utc>) -> String {
    let elapsed = now
      .signed_duration_since(self.uploaded_at)
      .to_std()
      .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
  }
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A resource row as read from a storage backend, joined with its subject.
///
/// Every field is loosely typed; [`Self::into_record`] validates it.
#[derive(Debug, Clone)]
pub struct RawResourceRow {
  pub id:           String,
  pub title:        String,
  pub description:  Option<String>,
  /// Storage vocabulary, e.g. `"pdf"` or `"question_paper"`.
  pub raw_type:     String,
  pub file_url:     Option<String>,
  /// RFC 3339 timestamp.
  pub created_at:   String,
  pub subject_id:   String,
  pub subject_name: String,
  pub semester:     i64,
  pub view_count:   Option<i64>,
}

impl RawResourceRow {
  pub fn into_record(self) -> Result<ResourceRecord> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyTitle);
    }

    let uploaded_at = DateTime::parse_from_rfc3339(&self.created_at)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| Error::DateParse(e.to_string()))?;

    let file_url = self
      .file_url
      .filter(|u| !u.trim().is_empty())
      .map(validate_file_url)
      .transpose()?;

    Ok(ResourceRecord {
      id: Uuid::parse_str(&self.id)?,
      title: self.title,
      description: self.description.filter(|d| !d.trim().is_empty()),
      kind: ResourceKind::canonicalize(&self.raw_type),
      subject: self.subject_name,
      subject_id: Some(Uuid::parse_str(&self.subject_id)?),
      semester: Semester::from_i64(self.semester)?,
      uploaded_at,
      file_url,
      view_count: self.view_count.unwrap_or(0).max(0) as u64,
    })
  }
}

/// Check that `url` is absolute; returns it unchanged on success.
pub fn validate_file_url(url: String) -> Result<String> {
  match Url::parse(&url) {
    Ok(_) => Ok(url),
    Err(source) => Err(Error::InvalidUrl { url, source }),
  }
}
