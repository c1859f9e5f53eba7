//! Error type for the pawnsync operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Http {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {url} → {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  /// A game file or downloaded record could not be interpreted.
  #[error("{}: {source}", .path.display())]
  Record {
    path:   PathBuf,
    #[source]
    source: pawnsync_core::Error,
  },

  /// A record inside a downloaded archive could not be interpreted.
  #[error("record in {url}: {source}")]
  ArchiveRecord {
    url:    String,
    #[source]
    source: pawnsync_core::Error,
  },

  #[error("io error at {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("core error: {0}")]
  Core(#[from] pawnsync_core::Error),

  #[error("store error: {0}")]
  Store(#[from] pawnsync_store_sqlite::Error),

  #[error("config error: {0}")]
  Config(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attach `path` to an [`std::io::Error`].
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
  let path = path.into();
  move |source| Error::Io { path, source }
}
