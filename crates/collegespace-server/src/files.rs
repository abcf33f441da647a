//! [`LocalFileStore`]: uploads kept on local disk, one directory per bucket.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use collegespace_core::storage::{Bucket, FileStore, object_name};

use crate::error::{Error, Result};

/// Files under `root/<bucket>/<name>`, published at
/// `<public_url>/files/<bucket>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
  root:       PathBuf,
  public_url: String,
}

impl LocalFileStore {
  /// Create the bucket directories under `root` if they are missing.
  pub async fn open(root: impl AsRef<Path>, public_url: &str) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    for bucket in [Bucket::UniversityImages, Bucket::Pdfs, Bucket::Images] {
      tokio::fs::create_dir_all(root.join(bucket.as_ref())).await?;
    }
    Ok(Self {
      root,
      public_url: public_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn root(&self) -> &Path { &self.root }

  pub fn public_url(&self, bucket: Bucket, name: &str) -> String {
    format!("{}/files/{bucket}/{name}", self.public_url)
  }

  /// Path of `name` inside `bucket`; names that could escape the bucket are
  /// rejected.
  fn path(&self, bucket: Bucket, name: &str) -> Result<PathBuf> {
    let plain = !name.is_empty()
      && name != "."
      && name != ".."
      && !name.contains(['/', '\\', '\0']);
    if !plain {
      return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(self.root.join(bucket.as_ref()).join(name))
  }
}

impl FileStore for LocalFileStore {
  type Error = Error;

  async fn upload(
    &self,
    bucket: Bucket,
    original_name: &str,
    bytes: Vec<u8>,
  ) -> Result<String> {
    let name = object_name(original_name);
    let path = self.path(bucket, &name)?;
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(path = %path.display(), "wrote upload");
    Ok(self.public_url(bucket, &name))
  }

  async fn remove(&self, bucket: Bucket, file_name: &str) -> Result<bool> {
    let path = self.path(bucket, file_name)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => {
        tracing::debug!(path = %path.display(), "removed upload");
        Ok(true)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
      Err(e) => Err(e.into()),
    }
  }
}
