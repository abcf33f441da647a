//! The catalog (universities, branches and subjects) and the
//! [`CatalogGateway`] trait through which resources are fetched.
//!
//! The trait is implemented by storage backends (e.g.
//! `collegespace-store-sqlite`). The API and the terminal client depend on
//! this abstraction, never on a concrete backend, so the filtering core can be
//! exercised against fixture data without a network.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::{ResourceRecord, Semester};

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  pub location:    String,
  pub website:     Option<String>,
  pub image_url:   Option<String>,
  /// Year of establishment.
  pub established: Option<i32>,
  pub created_at:  DateTime<Utc>,
}

/// An engineering branch (e.g. "Computer Science", code "CSE") offered by a
/// university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
  pub id:            Uuid,
  pub university_id: Uuid,
  pub name:          String,
  pub code:          Option<String>,
  pub description:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:          Uuid,
  pub branch_id:   Option<Uuid>,
  pub name:        String,
  pub description: String,
  pub semester:    Semester,
  pub credits:     u8,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`CatalogGateway::add_university`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUniversity {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub location:    String,
  pub website:     Option<String>,
  pub image_url:   Option<String>,
  pub established: Option<i32>,
}

/// Input to [`CatalogGateway::add_branch`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewBranch {
  pub university_id: Uuid,
  pub name:          String,
  pub code:          Option<String>,
  #[serde(default)]
  pub description:   String,
}

/// Input to [`CatalogGateway::add_subject`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
  pub branch_id:   Option<Uuid>,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  pub semester:    Semester,
  #[serde(default = "default_credits")]
  pub credits:     u8,
}

fn default_credits() -> u8 { 3 }

/// Input to [`CatalogGateway::add_resource`]. `created_at` and the view count
/// are always set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
  pub subject_id:  Uuid,
  pub title:       String,
  pub description: Option<String>,
  /// Storage vocabulary; canonicalised on read.
  #[serde(rename = "type", default = "default_raw_type")]
  pub raw_type:    String,
  pub file_url:    Option<String>,
}

fn default_raw_type() -> String { "pdf".to_owned() }

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Narrows a resource fetch; every set field must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
  pub semester:        Option<Semester>,
  pub university_id:   Option<Uuid>,
  /// Matched against the university's name, exactly.
  pub university_name: Option<String>,
  pub subject_id:      Option<Uuid>,
}

impl Scope {
  pub fn all() -> Self { Self::default() }

  pub fn semester(semester: Semester) -> Self {
    Self { semester: Some(semester), ..Self::default() }
  }

  pub fn university(id: Uuid) -> Self {
    Self { university_id: Some(id), ..Self::default() }
  }

  pub fn subject(id: Uuid) -> Self {
    Self { subject_id: Some(id), ..Self::default() }
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Errors reported by a [`CatalogGateway`].
pub trait GatewayError: std::error::Error + Send + Sync + 'static {
  /// `true` when the caller's input caused the failure (blank name, unknown
  /// parent, relative URL) rather than the backend.
  fn is_invalid_input(&self) -> bool { false }
}

/// Abstraction over the backing catalog store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogGateway: Send + Sync {
  type Error: GatewayError;

  // ── Resources ─────────────────────────────────────────────────────────

  /// Resources within `scope`, newest first.
  fn list_resources<'a>(
    &'a self,
    scope: &'a Scope,
  ) -> impl Future<Output = Result<Vec<ResourceRecord>, Self::Error>> + Send + 'a;

  /// Retrieve a resource by id. Returns `None` if not found.
  fn get_resource(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ResourceRecord>, Self::Error>> + Send + '_;

  /// Count one view or download and return the updated record. Returns
  /// `None` if not found.
  fn record_view(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ResourceRecord>, Self::Error>> + Send + '_;

  // ── Catalog reads ─────────────────────────────────────────────────────

  /// Subjects, optionally restricted to one semester, ordered by name.
  fn list_subjects(
    &self,
    semester: Option<Semester>,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  fn list_universities(
    &self,
  ) -> impl Future<Output = Result<Vec<University>, Self::Error>> + Send + '_;

  fn get_university(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<University>, Self::Error>> + Send + '_;

  fn list_branches(
    &self,
    university_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Branch>, Self::Error>> + Send + '_;

  // ── Administrative writes ─────────────────────────────────────────────

  fn add_university(
    &self,
    input: NewUniversity,
  ) -> impl Future<Output = Result<University, Self::Error>> + Send + '_;

  /// Returns an error if the university does not exist.
  fn add_branch(
    &self,
    input: NewBranch,
  ) -> impl Future<Output = Result<Branch, Self::Error>> + Send + '_;

  /// Returns an error if `branch_id` is set but the branch does not exist.
  fn add_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  /// Validate and persist a resource. Returns an error if the subject does
  /// not exist, the title is blank, or `file_url` is not absolute.
  fn add_resource(
    &self,
    input: NewResource,
  ) -> impl Future<Output = Result<ResourceRecord, Self::Error>> + Send + '_;

  /// Remove a resource. Returns `false` if it did not exist.
  fn delete_resource(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
