//! HTTP server for CollegeSpace.
//!
//! Mounts the JSON API under `/api` and serves uploaded files under `/files`
//! from a [`LocalFileStore`].

pub mod error;
pub mod files;

pub use error::Error;
pub use files::LocalFileStore;

use std::path::{Path, PathBuf};

use axum::Router;
use collegespace_api::{ApiState, api_router};
use collegespace_core::{catalog::CatalogGateway, storage::FileStore};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `COLLEGESPACE_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// Base URL clients reach this server at; prefixes uploaded file URLs.
  pub public_url:          String,
  pub store_path:          PathBuf,
  pub files_dir:           PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The whole application: API, uploaded files, and request tracing.
pub fn router<C, F>(state: ApiState<C, F>, files_dir: &Path) -> Router
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .nest_service("/files", ServeDir::new(files_dir))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use collegespace_api::AuthConfig;
  use collegespace_store_sqlite::SqliteCatalog;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_app() -> (Router, PathBuf) {
    let dir = std::env::temp_dir().join(format!("collegespace-server-{}", uuid::Uuid::new_v4()));
    let files = LocalFileStore::open(&dir, "http://localhost:8080").await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();

    let state = ApiState {
      catalog: Arc::new(SqliteCatalog::open_in_memory().await.unwrap()),
      files:   Arc::new(files),
      auth:    Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
    };
    (router(state, &dir), dir)
  }

  #[tokio::test]
  async fn api_is_nested() {
    let (app, dir) = make_app().await;
    let req = Request::builder().uri("/api/resources").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    std::fs::remove_dir_all(dir).ok();
  }

  #[tokio::test]
  async fn uploaded_file_is_served() {
    let (app, dir) = make_app().await;

    let req = Request::builder()
      .method("POST")
      .uri("/api/files/pdfs?name=notes.pdf")
      .header(header::AUTHORIZATION, format!("Basic {}", B64.encode("admin:secret")))
      .body(Body::from("%PDF-1.7"))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let url = body["url"].as_str().unwrap();
    let path = url.strip_prefix("http://localhost:8080").unwrap();

    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let served = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], b"%PDF-1.7");

    std::fs::remove_dir_all(dir).ok();
  }

  #[tokio::test]
  async fn removing_an_escaping_name_is_a_client_error() {
    let (app, dir) = make_app().await;
    let req = Request::builder()
      .method("DELETE")
      .uri("/api/files/pdfs/%2E%2E")
      .header(header::AUTHORIZATION, format!("Basic {}", B64.encode("admin:secret")))
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(dir.join("pdfs").is_dir());
    std::fs::remove_dir_all(dir).ok();
  }
}
