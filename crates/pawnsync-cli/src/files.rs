//! Directory scanning shared by import and merge.

use std::path::{Path, PathBuf};

use crate::{Result, error::io_error};

pub const PGN_EXTENSION: &str = "pgn";

/// Regular `*.pgn` files directly inside `directory`, sorted by path.
pub async fn pgn_files(directory: &Path) -> Result<Vec<PathBuf>> {
  let mut entries = tokio::fs::read_dir(directory)
    .await
    .map_err(io_error(directory))?;

  let mut files = Vec::new();
  while let Some(entry) = entries.next_entry().await.map_err(io_error(directory))? {
    let path = entry.path();
    if path.extension().is_none_or(|ext| ext != PGN_EXTENSION) {
      continue;
    }
    let meta = tokio::fs::metadata(&path).await.map_err(io_error(&path))?;
    if meta.is_file() {
      files.push(path);
    }
  }

  files.sort();
  Ok(files)
}
