//! JSON REST API for CollegeSpace.
//!
//! Exposes an axum [`Router`] backed by any [`CatalogGateway`] and
//! [`FileStore`]. Reads are public; writes require the admin's HTTP Basic
//! credentials. TLS and static file serving are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", collegespace_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod files;
pub mod resources;
pub mod subjects;
pub mod universities;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, post},
};
use collegespace_core::{catalog::CatalogGateway, storage::FileStore};

pub use auth::AuthConfig;
pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<C, F> {
  pub catalog: Arc<C>,
  pub files:   Arc<F>,
  pub auth:    Arc<AuthConfig>,
}

impl<C, F> Clone for ApiState<C, F> {
  fn clone(&self) -> Self {
    Self {
      catalog: self.catalog.clone(),
      files:   self.files.clone(),
      auth:    self.auth.clone(),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C, F>(state: ApiState<C, F>) -> Router<()>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  Router::new()
    // Universities and branches
    .route(
      "/universities",
      get(universities::list::<C, F>).post(universities::create::<C, F>),
    )
    .route("/universities/{id}", get(universities::get_one::<C, F>))
    .route("/universities/{id}/branches", get(universities::branches::<C, F>))
    .route("/universities/{id}/resources", get(resources::by_university::<C, F>))
    .route("/branches", post(universities::create_branch::<C, F>))
    // Subjects
    .route("/subjects", get(subjects::list::<C, F>).post(subjects::create::<C, F>))
    .route("/subjects/{id}/resources", get(resources::by_subject::<C, F>))
    // Resources
    .route("/semesters/{n}/resources", get(resources::by_semester::<C, F>))
    .route("/resources", get(resources::list::<C, F>).post(resources::create::<C, F>))
    .route(
      "/resources/{id}",
      get(resources::get_one::<C, F>).delete(resources::delete_one::<C, F>),
    )
    .route("/resources/{id}/download", get(resources::download::<C, F>))
    // Files
    .route(
      "/files/{bucket}",
      post(files::upload::<C, F>).layer(DefaultBodyLimit::max(files::MAX_UPLOAD_BYTES)),
    )
    .route("/files/{bucket}/{name}", delete(files::remove::<C, F>))
    // Session
    .route("/session", get(auth::session::<C, F>))
    .with_state(state)
}
