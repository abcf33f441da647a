//! Handlers for `/files` endpoints. Both are admin only.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/files/{bucket}?name=<original>` | Raw body; returns `{"url": …}` |
//! | `DELETE` | `/files/{bucket}/{name}` | 404 if absent |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use collegespace_core::{
  catalog::CatalogGateway,
  storage::{Bucket, FileStore},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, auth::AdminAuthenticated, error::ApiError};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

fn bucket(raw: &str) -> Result<Bucket, ApiError> {
  Bucket::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  /// Original file name; only its extension is kept.
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Uploaded {
  pub url: String,
}

/// `POST /files/{bucket}?name=<original>`
pub async fn upload<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Path(raw_bucket): Path<String>,
  Query(params): Query<UploadParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let bucket = bucket(&raw_bucket)?;
  if body.is_empty() {
    return Err(ApiError::BadRequest("empty upload".to_string()));
  }

  let size = body.len();
  let url = state
    .files
    .upload(bucket, &params.name, body.to_vec())
    .await
    .map_err(ApiError::files)?;
  tracing::info!(%bucket, size, %url, "stored upload");
  Ok((StatusCode::CREATED, Json(Uploaded { url })))
}

/// `DELETE /files/{bucket}/{name}`
pub async fn remove<C, F>(
  _admin: AdminAuthenticated,
  State(state): State<ApiState<C, F>>,
  Path((raw_bucket, name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  let bucket = bucket(&raw_bucket)?;
  let removed = state
    .files
    .remove(bucket, &name)
    .await
    .map_err(ApiError::files)?;
  if !removed {
    return Err(ApiError::NotFound(format!("{bucket}/{name} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
