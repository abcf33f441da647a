//! Async HTTP client wrapping the CollegeSpace JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use collegespace_core::{
  catalog::Scope,
  filter::ResourcePage,
  resource::ResourceRecord,
};
use reqwest::{Client, Url, header, redirect};
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the CollegeSpace API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the CollegeSpace JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Path segments (below `/api`) of the listing route for `scope`.
///
/// The listing routes carry one scope each; the first set field wins, in the
/// order subject, university, semester.
pub fn scope_segments(scope: &Scope) -> Vec<String> {
  if let Some(id) = scope.subject_id {
    return vec!["subjects".into(), id.to_string(), "resources".into()];
  }
  if let Some(id) = scope.university_id {
    return vec!["universities".into(), id.to_string(), "resources".into()];
  }
  if let Some(name) = &scope.university_name {
    return vec!["universities".into(), name.clone(), "resources".into()];
  }
  if let Some(semester) = scope.semester {
    return vec!["semesters".into(), semester.to_string(), "resources".into()];
  }
  vec!["resources".into()]
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .redirect(redirect::Policy::none())
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// `<base_url>/api/<segments…>`, each segment percent-encoded.
  fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .with_context(|| format!("invalid server URL {:?}", self.config.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("server URL {:?} cannot have a path", self.config.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  pub fn has_credentials(&self) -> bool { !self.config.username.is_empty() }

  // ── Resources ─────────────────────────────────────────────────────────────

  /// Every resource in `scope`, unfiltered; filtering happens locally.
  pub async fn list_resources(&self, scope: &Scope) -> Result<Vec<ResourceRecord>> {
    let url = self.url(&scope_segments(scope))?;
    let path = url.path().to_string();
    let resp = self
      .auth(self.client.get(url))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {path} → {}", resp.status()));
    }
    let page: ResourcePage = resp.json().await.context("deserialising resources")?;
    Ok(page.items)
  }

  /// `GET /api/resources/{id}/download`: counts a view and returns the
  /// file's URL without following the redirect.
  pub async fn download_url(&self, id: Uuid) -> Result<String> {
    let resp = self
      .auth(self.client.get(self.url(&["resources", &id.to_string(), "download"])?))
      .send()
      .await
      .context("GET /resources/{id}/download failed")?;

    if !resp.status().is_redirection() {
      return Err(anyhow!("download {id} → {}", resp.status()));
    }
    resp
      .headers()
      .get(header::LOCATION)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned)
      .ok_or_else(|| anyhow!("download {id}: redirect without a location"))
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `GET /api/session`: whether the configured credentials are the admin's.
  pub async fn is_admin(&self) -> Result<bool> {
    #[derive(Deserialize)]
    struct Session {
      admin: bool,
    }

    let resp = self
      .auth(self.client.get(self.url(&["session"])?))
      .send()
      .await
      .context("GET /session failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /session → {}", resp.status()));
    }
    let session: Session = resp.json().await.context("deserialising session")?;
    Ok(session.admin)
  }
}
