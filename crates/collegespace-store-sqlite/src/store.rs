//! [`SqliteCatalog`]: the SQLite implementation of [`CatalogGateway`].

use std::path::Path;

use chrono::Utc;
use collegespace_core::{
  catalog::{
    Branch, CatalogGateway, NewBranch, NewResource, NewSubject, NewUniversity,
    Scope, Subject, University,
  },
  resource::{RawResourceRow, ResourceRecord, Semester, validate_file_url},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    BRANCH_COLUMNS, RESOURCE_COLUMNS, RawBranch, RawSubject, RawUniversity,
    SUBJECT_COLUMNS, UNIVERSITY_COLUMNS, encode_dt, encode_uuid, non_blank,
    read_resource_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteCatalog {
  conn: tokio_rusqlite::Connection,
}

impl SqliteCatalog {
  /// Open (or create) a catalog at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory catalog, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether a row with primary key `id` exists in `table`.
  async fn exists(&self, table: &'static str, key: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT 1 FROM {table} WHERE {key} = ?1"),
              rusqlite::params![id_str],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(found)
  }

  /// Read resources with an optional extra `WHERE` clause over `r`/`s`/`u`.
  async fn query_resources(
    &self,
    where_clause: &'static str,
    params: Vec<Option<String>>,
  ) -> Result<Vec<ResourceRecord>> {
    let raws: Vec<RawResourceRow> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {RESOURCE_COLUMNS}
           FROM resources r
           JOIN subjects s          ON s.subject_id    = r.subject_id
           LEFT JOIN branches b     ON b.branch_id     = s.branch_id
           LEFT JOIN universities u ON u.university_id = b.university_id
           {where_clause}
           ORDER BY r.created_at DESC, r.rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), read_resource_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_record().map_err(Error::from))
      .collect()
  }
}

// ─── CatalogGateway impl ─────────────────────────────────────────────────────

impl CatalogGateway for SqliteCatalog {
  type Error = Error;

  // ── Resources ─────────────────────────────────────────────────────────────

  async fn list_resources(&self, scope: &Scope) -> Result<Vec<ResourceRecord>> {
    // Unset scope fields bind NULL and drop out of the conjunction.
    let params = vec![
      scope.semester.map(|s| s.get().to_string()),
      scope.university_id.map(encode_uuid),
      scope.university_name.clone(),
      scope.subject_id.map(encode_uuid),
    ];
    self
      .query_resources(
        "WHERE (?1 IS NULL OR s.semester = CAST(?1 AS INTEGER))
           AND (?2 IS NULL OR u.university_id = ?2)
           AND (?3 IS NULL OR u.name = ?3)
           AND (?4 IS NULL OR s.subject_id = ?4)",
        params,
      )
      .await
  }

  async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceRecord>> {
    let mut found = self
      .query_resources("WHERE r.resource_id = ?1", vec![Some(encode_uuid(id))])
      .await?;
    Ok(found.pop())
  }

  async fn record_view(&self, id: Uuid) -> Result<Option<ResourceRecord>> {
    let id_str = encode_uuid(id);
    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE resources SET view_count = view_count + 1 WHERE resource_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_resource(id).await
  }

  // ── Catalog reads ─────────────────────────────────────────────────────────

  async fn list_subjects(&self, semester: Option<Semester>) -> Result<Vec<Subject>> {
    let semester = semester.map(|s| i64::from(s.get()));

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects
           WHERE ?1 IS NULL OR semester = ?1
           ORDER BY name, subject_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![semester], RawSubject::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  async fn list_universities(&self) -> Result<Vec<University>> {
    let raws: Vec<RawUniversity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {UNIVERSITY_COLUMNS} FROM universities ORDER BY name, university_id"
        ))?;
        let rows = stmt
          .query_map([], RawUniversity::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUniversity::into_university).collect()
  }

  async fn get_university(&self, id: Uuid) -> Result<Option<University>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUniversity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {UNIVERSITY_COLUMNS} FROM universities WHERE university_id = ?1"),
              rusqlite::params![id_str],
              RawUniversity::read,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUniversity::into_university).transpose()
  }

  async fn list_branches(&self, university_id: Uuid) -> Result<Vec<Branch>> {
    let id_str = encode_uuid(university_id);

    let raws: Vec<RawBranch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BRANCH_COLUMNS} FROM branches WHERE university_id = ?1 ORDER BY name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawBranch::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBranch::into_branch).collect()
  }

  // ── Administrative writes ─────────────────────────────────────────────────

  async fn add_university(&self, input: NewUniversity) -> Result<University> {
    if input.name.trim().is_empty() {
      return Err(Error::Blank("university name"));
    }

    let university = University {
      id:          Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      location:    input.location,
      website:     non_blank(input.website),
      image_url:   non_blank(input.image_url),
      established: input.established,
      created_at:  Utc::now(),
    };

    let row = university.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO universities (
             university_id, name, description, location,
             website, image_url, established, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            encode_uuid(row.id),
            row.name,
            row.description,
            row.location,
            row.website,
            row.image_url,
            row.established,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %university.id, name = %university.name, "university added");
    Ok(university)
  }

  async fn add_branch(&self, input: NewBranch) -> Result<Branch> {
    if input.name.trim().is_empty() {
      return Err(Error::Blank("branch name"));
    }
    if !self.exists("universities", "university_id", input.university_id).await? {
      return Err(Error::UniversityNotFound(input.university_id));
    }

    let branch = Branch {
      id:            Uuid::new_v4(),
      university_id: input.university_id,
      name:          input.name,
      code:          non_blank(input.code),
      description:   input.description,
    };

    let row = branch.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO branches (branch_id, university_id, name, code, description)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(row.id),
            encode_uuid(row.university_id),
            row.name,
            row.code,
            row.description,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %branch.id, name = %branch.name, "branch added");
    Ok(branch)
  }

  async fn add_subject(&self, input: NewSubject) -> Result<Subject> {
    if input.name.trim().is_empty() {
      return Err(Error::Blank("subject name"));
    }
    if let Some(branch_id) = input.branch_id
      && !self.exists("branches", "branch_id", branch_id).await?
    {
      return Err(Error::BranchNotFound(branch_id));
    }

    let subject = Subject {
      id:          Uuid::new_v4(),
      branch_id:   input.branch_id,
      name:        input.name,
      description: input.description,
      semester:    input.semester,
      credits:     input.credits,
    };

    let row = subject.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (subject_id, branch_id, name, description, semester, credits)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            encode_uuid(row.id),
            row.branch_id.map(encode_uuid),
            row.name,
            row.description,
            row.semester.get(),
            row.credits,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %subject.id, name = %subject.name, "subject added");
    Ok(subject)
  }

  async fn add_resource(&self, input: NewResource) -> Result<ResourceRecord> {
    if input.title.trim().is_empty() {
      return Err(collegespace_core::Error::EmptyTitle.into());
    }
    let file_url = non_blank(input.file_url).map(validate_file_url).transpose()?;

    let subject_id_str = encode_uuid(input.subject_id);
    let subject: Option<(String, i64)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name, semester FROM subjects WHERE subject_id = ?1",
              rusqlite::params![subject_id_str],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;
    let (subject_name, semester) =
      subject.ok_or(Error::SubjectNotFound(input.subject_id))?;

    let raw = RawResourceRow {
      id: encode_uuid(Uuid::new_v4()),
      title: input.title,
      description: non_blank(input.description),
      raw_type: input.raw_type.trim().to_lowercase(),
      file_url,
      created_at: encode_dt(Utc::now()),
      subject_id: encode_uuid(input.subject_id),
      subject_name,
      semester,
      view_count: Some(0),
    };

    let row = raw.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO resources (
             resource_id, subject_id, title, description,
             type, file_url, view_count, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![
            row.id,
            row.subject_id,
            row.title,
            row.description,
            row.raw_type,
            row.file_url,
            row.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    let record = raw.into_record()?;
    tracing::debug!(id = %record.id, title = %record.title, "resource added");
    Ok(record)
  }

  async fn delete_resource(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM resources WHERE resource_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted > 0 {
      tracing::debug!(%id, "resource deleted");
    }
    Ok(deleted > 0)
  }
}
