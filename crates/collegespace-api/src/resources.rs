//! Handlers for resource listings and `/resources/{id}` endpoints.
//!
//! Every listing route accepts the filter-state query encoding (`q`,
//! `subject`, `subject_id`, `type`, `semester`) and answers with a
//! [`ResourcePage`]. The scope a listing is drawn from is part of the path:
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/resources` | Whole catalog |
//! | `GET`    | `/semesters/{n}/resources` | 400 unless `1..=8` |
//! | `GET`    | `/subjects/{id}/resources` | |
//! | `GET`    | `/universities/{id}/resources` | `{id}` is a UUID or an exact name |
//! | `POST`   | `/resources` | Admin only |
//! | `GET`    | `/resources/{id}` | 404 if not found |
//! | `DELETE` | `/resources/{id}` | Admin only |
//! | `GET`    | `/resources/{id}/download` | Counts a view, then redirects |

use axum::{
  Json,
  extract::{Path, RawQuery, State},
  http::StatusCode,
  response::{IntoResponse, Redirect},
};
use collegespace_core::{
  catalog::{CatalogGateway, NewResource, Scope},
  filter::{FilterState, ResourcePage},
  resource::{ResourceRecord, Semester},
  storage::FileStore,
};
use uuid::Uuid;

use crate::{ApiState, auth::AdminAuthenticated, error::ApiError};

// ─── Listings ─────────────────────────────────────────────────────────────────

async fn page<C: CatalogGateway>(
  catalog: &C,
  scope: Scope,
  query: Option<String>,
) -> Result<Json<ResourcePage>, ApiError> {
  let records = catalog
    .list_resources(&scope)
    .await
    .map_err(ApiError::gateway)?;
  let state = FilterState::from_query_string(query.as_deref().unwrap_or_default());
  Ok(Json(ResourcePage::build(&records, &state)))
}

/// `GET /resources[?<filter>]`
pub async fn list<C, F>(
  State(state): State<ApiState<C, F>>,
  RawQuery(query): RawQuery,
) -> Result<Json<ResourcePage>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  page(&*state.catalog, Scope::all(), query).await
}

/// `GET /semesters/{n}/resources[?<filter>]`
pub async fn by_semester<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(raw): Path<String>,
  RawQuery(query): RawQuery,
) -> Result<Json<ResourcePage>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let semester = raw
    .parse::<u8>()
    .map_err(|_| ApiError::BadRequest(format!("invalid semester {raw:?}")))
    .and_then(|n| Semester::new(n).map_err(|e| ApiError::BadRequest(e.to_string())))?;
  page(&*state.catalog, Scope::semester(semester), query).await
}

/// `GET /subjects/{id}/resources[?<filter>]`
pub async fn by_subject<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
  RawQuery(query): RawQuery,
) -> Result<Json<ResourcePage>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  page(&*state.catalog, Scope::subject(id), query).await
}

/// `GET /universities/{id}/resources[?<filter>]`
pub async fn by_university<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<String>,
  RawQuery(query): RawQuery,
) -> Result<Json<ResourcePage>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let scope = match Uuid::parse_str(&id) {
    Ok(uuid) => Scope::university(uuid),
    Err(_) => Scope { university_name: Some(id), ..Scope::default() },
  };
  page(&*state.catalog, scope, query).await
}

// ─── Single resource ──────────────────────────────────────────────────────────

/// `POST /resources`
pub async fn create<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Json(body): Json<NewResource>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let record = state
    .catalog
    .add_resource(body)
    .await
    .map_err(ApiError::gateway)?;
  tracing::info!(id = %record.id, title = %record.title, "created resource");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /resources/{id}`
pub async fn get_one<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResourceRecord>, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let record = state
    .catalog
    .get_resource(id)
    .await
    .map_err(ApiError::gateway)?
    .ok_or_else(|| ApiError::NotFound(format!("resource {id} not found")))?;
  Ok(Json(record))
}

/// `DELETE /resources/{id}`
pub async fn delete_one<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let deleted = state
    .catalog
    .delete_resource(id)
    .await
    .map_err(ApiError::gateway)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("resource {id} not found")));
  }
  tracing::info!(%id, "deleted resource");
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /resources/{id}/download`: `307` to the file. Only a redirect counts
/// as a view.
pub async fn download<C, F>(
  State(state): State<ApiState<C, F>>,
  Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let not_found = || ApiError::NotFound(format!("resource {id} not found"));
  let record = state
    .catalog
    .get_resource(id)
    .await
    .map_err(ApiError::gateway)?
    .ok_or_else(not_found)?;
  if record.file_url.is_none() {
    return Err(ApiError::NotFound(format!("resource {id} has no file")));
  }

  let url = state
    .catalog
    .record_view(id)
    .await
    .map_err(ApiError::gateway)?
    .and_then(|record| record.file_url)
    .ok_or_else(not_found)?;
  Ok(Redirect::temporary(&url))
}
