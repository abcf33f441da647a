//! Error type for the local file store.

use collegespace_core::storage::FileStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid file name: {0:?}")]
  InvalidFileName(String),
}

impl FileStoreError for Error {
  fn is_invalid_input(&self) -> bool { matches!(self, Self::InvalidFileName(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
