//! The [`ArchiveSource`] trait: where monthly game archives come from.
//!
//! Implemented over HTTP by `pawnsync-cli`; tests use in-memory sources.

use std::future::Future;

/// A provider of per-user monthly game archives.
pub trait ArchiveSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Archive URLs for `username`, oldest first.
  fn list_archives(
    &self,
    username: &str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

  /// The bulk PGN body of one archive.
  fn archive_pgn(
    &self,
    archive_url: &str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
