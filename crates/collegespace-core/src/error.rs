//! Error types for `collegespace-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("semester must be within 1..=8, got {0}")]
  InvalidSemester(i64),

  #[error("resource title is empty")]
  EmptyTitle,

  #[error("invalid file url {url:?}: {source}")]
  InvalidUrl {
    url:    String,
    #[source]
    source: url::ParseError,
  },

  #[error("invalid identifier: {0}")]
  InvalidId(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown bucket: {0:?}")]
  UnknownBucket(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
