//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Optional `?semester=1..8` |
//! | `POST` | `/subjects` | Admin only |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use collegespace_core::{
  catalog::{CatalogGateway, NewSubject, Subject},
  resource::Semester,
  storage::FileStore,
};
use serde::Deserialize;

use crate::{ApiState, auth::AdminAuthenticated, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub semester: Option<Semester>,
}

/// `GET /subjects[?semester=<n>]`
pub async fn list<C, F>(
  State(state): State<ApiState<C, F>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let subjects = state
    .catalog
    .list_subjects(params.semester)
    .await
    .map_err(ApiError::gateway)?;
  Ok(Json(subjects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subjects`
pub async fn create<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Json(body): Json<NewSubject>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let subject = state
    .catalog
    .add_subject(body)
    .await
    .map_err(ApiError::gateway)?;
  tracing::info!(id = %subject.id, name = %subject.name, "created subject");
  Ok((StatusCode::CREATED, Json(subject)))
}
