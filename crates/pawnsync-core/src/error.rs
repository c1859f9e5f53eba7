//! Error types for `pawnsync-core`.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::TagName;

#[derive(Debug, Error)]
pub enum Error {
  /// The record has no (or an empty) value for a tag that was asked for.
  #[error("record has no {0} tag")]
  MissingTag(TagName),

  /// A player name that would not stay inside the games directory.
  #[error("player name {0:?} cannot be used in a file name")]
  UnsafeFileName(String),

  #[error("io error at {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
