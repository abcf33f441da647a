//! Fixture data shared by the unit tests: the twelve-record library listing.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::resource::{ResourceKind, ResourceRecord, Semester};

pub fn sem(n: u8) -> Semester { Semester::new(n).unwrap() }

/// Deterministic per-subject id so records sharing a subject share an id.
fn subject_id(name: &str) -> Uuid {
  let n = match name {
    "Computer Science" => 1,
    "Electronics" => 2,
    "Mechanical" => 3,
    _ => 4,
  };
  Uuid::from_u128(0x5000 + n)
}

pub fn sample_records() -> Vec<ResourceRecord> {
  use ResourceKind::{Book, Notes, Paper};

  let rows: [(&str, ResourceKind, &str, u8, i64, u64); 12] = [
    ("Digital Electronics Complete Notes", Notes, "Electronics", 3, 2, 342),
    (
      "Data Structures Final Exam Question Paper 2023",
      Paper,
      "Computer Science",
      3,
      7,
      821,
    ),
    ("Fluid Mechanics Textbook Solutions", Book, "Mechanical", 4, 3, 512),
    (
      "Microprocessors and Microcontrollers Lab Manual",
      Notes,
      "Electronics",
      5,
      5,
      378,
    ),
    (
      "Discrete Mathematics Mid-Semester Paper with Solutions",
      Paper,
      "Mathematics",
      2,
      14,
      645,
    ),
    ("Computer Networks Illustrated Guide", Book, "Computer Science", 6, 1, 289),
    (
      "Engineering Mathematics: Calculus and Linear Algebra",
      Notes,
      "Mathematics",
      1,
      30,
      1248,
    ),
    (
      "Operating Systems Principles and Design",
      Book,
      "Computer Science",
      5,
      14,
      567,
    ),
    (
      "Signals and Systems Previous Year Questions",
      Paper,
      "Electronics",
      4,
      21,
      723,
    ),
    (
      "Database Management Systems Comprehensive Notes",
      Notes,
      "Computer Science",
      4,
      7,
      832,
    ),
    ("Strength of Materials Formula Sheet", Notes, "Mechanical", 3, 2, 476),
    (
      "Compiler Design End Semester Exam 2023",
      Paper,
      "Computer Science",
      7,
      30,
      581,
    ),
  ];

  let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

  rows
    .into_iter()
    .enumerate()
    .map(|(i, (title, kind, subject, semester, days_ago, views))| {
      ResourceRecord {
        id: Uuid::from_u128(i as u128 + 1),
        title: title.into(),
        description: None,
        kind,
        subject: subject.into(),
        subject_id: Some(subject_id(subject)),
        semester: sem(semester),
        uploaded_at: now - Duration::days(days_ago),
        file_url: None,
        view_count: views,
      }
    })
    .collect()
}
