//! Error type for `collegespace-store-sqlite`.

use collegespace_core::catalog::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A row failed validation on its way out of (or into) the database.
  #[error("invalid record: {0}")]
  Core(#[from] collegespace_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("{0} must not be blank")]
  Blank(&'static str),

  #[error("university not found: {0}")]
  UniversityNotFound(uuid::Uuid),

  #[error("branch not found: {0}")]
  BranchNotFound(uuid::Uuid),

  #[error("subject not found: {0}")]
  SubjectNotFound(uuid::Uuid),
}

impl GatewayError for Error {
  fn is_invalid_input(&self) -> bool {
    matches!(
      self,
      Self::Core(_)
        | Self::Blank(_)
        | Self::UniversityNotFound(_)
        | Self::BranchNotFound(_)
        | Self::SubjectNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
