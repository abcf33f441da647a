//! Admin authentication: HTTP Basic credentials checked against one
//! configured username and argon2 hash.
//!
//! There is no session. Every write request carries the credentials, so
//! "logging in" on a client means remembering them and "logging out" means
//! forgetting them.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use collegespace_core::{catalog::CatalogGateway, storage::FileStore};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

/// Credentials accepted for administrative requests.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the request carried valid
/// admin credentials.
pub struct AdminAuthenticated;

/// Verify Basic credentials in `headers` against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  if username != config.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash =
    PasswordHash::new(&config.password_hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<C, F> FromRequestParts<ApiState<C, F>> for AdminAuthenticated
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<C, F>,
  ) -> Result<Self, Self::Rejection> {
    if let Err(e) = verify_auth(&parts.headers, &state.auth) {
      tracing::warn!(path = %parts.uri.path(), "rejected admin request");
      return Err(e);
    }
    Ok(AdminAuthenticated)
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Session {
  pub admin: bool,
}

/// `GET /session`: whether the supplied credentials are the admin's.
pub async fn session<C, F>(
  State(state): State<ApiState<C, F>>,
  headers: HeaderMap,
) -> Json<Session>
where
  C: CatalogGateway + 'static,
  F: FileStore + 'static,
{
  Json(Session { admin: verify_auth(&headers, &state.auth).is_ok() })
}
