//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! so that text ordering equals time ordering. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use collegespace_core::{
  catalog::{Branch, Subject, University},
  resource::{RawResourceRow, Semester},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Empty strings from form-style input mean "absent".
pub fn non_blank(s: Option<String>) -> Option<String> {
  s.filter(|v| !v.trim().is_empty())
}

// ─── Resources ───────────────────────────────────────────────────────────────

/// Columns selected for every resource query, in [`read_resource_row`] order.
pub const RESOURCE_COLUMNS: &str = "
  r.resource_id, r.title, r.description, r.type, r.file_url, r.created_at,
  s.subject_id, s.name, s.semester, r.view_count";

pub fn read_resource_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawResourceRow> {
  Ok(RawResourceRow {
    id:           row.get(0)?,
    title:        row.get(1)?,
    description:  row.get(2)?,
    raw_type:     row.get(3)?,
    file_url:     row.get(4)?,
    created_at:   row.get(5)?,
    subject_id:   row.get(6)?,
    subject_name: row.get(7)?,
    semester:     row.get(8)?,
    view_count:   row.get(9)?,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `universities` row.
pub struct RawUniversity {
  pub university_id: String,
  pub name:          String,
  pub description:   String,
  pub location:      String,
  pub website:       Option<String>,
  pub image_url:     Option<String>,
  pub established:   Option<i32>,
  pub created_at:    String,
}

pub const UNIVERSITY_COLUMNS: &str = "university_id, name, description, location, \
                                      website, image_url, established, created_at";

impl RawUniversity {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      university_id: row.get(0)?,
      name:          row.get(1)?,
      description:   row.get(2)?,
      location:      row.get(3)?,
      website:       row.get(4)?,
      image_url:     row.get(5)?,
      established:   row.get(6)?,
      created_at:    row.get(7)?,
    })
  }

  pub fn into_university(self) -> Result<University> {
    Ok(University {
      id:          decode_uuid(&self.university_id)?,
      name:        self.name,
      description: self.description,
      location:    self.location,
      website:     self.website,
      image_url:   self.image_url,
      established: self.established,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `branches` row.
pub struct RawBranch {
  pub branch_id:     String,
  pub university_id: String,
  pub name:          String,
  pub code:          Option<String>,
  pub description:   String,
}

pub const BRANCH_COLUMNS: &str = "branch_id, university_id, name, code, description";

impl RawBranch {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      branch_id:     row.get(0)?,
      university_id: row.get(1)?,
      name:          row.get(2)?,
      code:          row.get(3)?,
      description:   row.get(4)?,
    })
  }

  pub fn into_branch(self) -> Result<Branch> {
    Ok(Branch {
      id:            decode_uuid(&self.branch_id)?,
      university_id: decode_uuid(&self.university_id)?,
      name:          self.name,
      code:          self.code,
      description:   self.description,
    })
  }
}

/// Raw values read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id:  String,
  pub branch_id:   Option<String>,
  pub name:        String,
  pub description: String,
  pub semester:    i64,
  pub credits:     i64,
}

pub const SUBJECT_COLUMNS: &str = "subject_id, branch_id, name, description, semester, credits";

impl RawSubject {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subject_id:  row.get(0)?,
      branch_id:   row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      semester:    row.get(4)?,
      credits:     row.get(5)?,
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:          decode_uuid(&self.subject_id)?,
      branch_id:   self.branch_id.as_deref().map(decode_uuid).transpose()?,
      name:        self.name,
      description: self.description,
      semester:    Semester::from_i64(self.semester)?,
      credits:     self.credits.clamp(0, i64::from(u8::MAX)) as u8,
    })
  }
}
