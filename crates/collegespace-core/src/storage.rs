//! File storage for uploaded resources and university images.

use std::{future::Future, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::Error;

/// A named storage area for uploaded files.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Bucket {
  UniversityImages,
  Pdfs,
  Images,
}

impl Bucket {
  /// Where a resource upload goes, judged by its raw storage type.
  pub fn for_resource_type(raw_type: &str) -> Self {
    if raw_type.eq_ignore_ascii_case("pdf") {
      Self::Pdfs
    } else {
      Self::Images
    }
  }

  pub fn parse(s: &str) -> Result<Self, Error> {
    Self::from_str(s).map_err(|_| Error::UnknownBucket(s.to_owned()))
  }
}

/// A fresh random object name that keeps the extension of `original`.
///
/// `"lecture 3.PDF"` becomes e.g. `"9f1c…e2.PDF"`; names without an extension
/// get none.
pub fn object_name(original: &str) -> String {
  let stem = Uuid::new_v4().simple().to_string();
  let ext = original
    .rsplit_once('.')
    .map(|(_, ext)| ext)
    .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
  match ext {
    Some(ext) => format!("{stem}.{ext}"),
    None => stem,
  }
}

/// Errors reported by a [`FileStore`].
pub trait FileStoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the caller's input caused the failure, such as a file name
  /// that would leave its bucket.
  fn is_invalid_input(&self) -> bool { false }
}

/// Abstraction over a file store. Uploads are never overwritten; each gets a
/// fresh [`object_name`].
pub trait FileStore: Send + Sync {
  type Error: FileStoreError;

  /// Store `bytes` in `bucket` and return the file's public URL.
  fn upload<'a>(
    &'a self,
    bucket: Bucket,
    original_name: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Delete `file_name` from `bucket`. Returns `false` if it did not exist.
  fn remove<'a>(
    &'a self,
    bucket: Bucket,
    file_name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
