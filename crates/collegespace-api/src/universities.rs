//! Handlers for `/universities` and `/branches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/universities` | Ordered by name |
//! | `POST` | `/universities` | Admin only |
//! | `GET`  | `/universities/{id}` | 404 if not found |
//! | `GET`  | `/universities/{id}/branches` | |
//! | `POST` | `/branches` | Admin only; 400 if the university is unknown |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use collegespace_core::{
  catalog::{Branch, CatalogGateway, NewBranch, NewUniversity, University},
  storage::FileStore,
};
use uuid::Uuid;

use crate::{ApiState, auth::AdminAuthenticated, error::ApiError};

/// `GET /universities`
pub async fn list<C, F>(
  State(state): State<ApiState<C, F>>,
) -> Result<Json<Vec<University>>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let universities = state
    .catalog
    .list_universities()
    .await
    .map_err(ApiError::gateway)?;
  Ok(Json(universities))
}

/// `POST /universities`
pub async fn create<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Json(body): Json<NewUniversity>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let university = state
    .catalog
    .add_university(body)
    .await
    .map_err(ApiError::gateway)?;
  tracing::info!(id = %university.id, name = %university.name, "created university");
  Ok((StatusCode::CREATED, Json(university)))
}

/// `GET /universities/{id}`
pub async fn get_one<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<University>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let university = state
    .catalog
    .get_university(id)
    .await
    .map_err(ApiError::gateway)?
    .ok_or_else(|| ApiError::NotFound(format!("university {id} not found")))?;
  Ok(Json(university))
}

/// `GET /universities/{id}/branches`
pub async fn branches<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Branch>>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let branches = state
    .catalog
    .list_branches(id)
    .await
    .map_err(ApiError::gateway)?;
  Ok(Json(branches))
}

/// `POST /branches`
pub async fn create_branch<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Json(body): Json<NewBranch>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let branch = state
    .catalog
    .add_branch(body)
    .await
    .map_err(ApiError::gateway)?;
  tracing::info!(id = %branch.id, name = %branch.name, "created branch");
  Ok((StatusCode::CREATED, Json(branch)))
}
