//! Loading game files into the SQLite store.

use std::path::Path;

use pawnsync_core::{game::NewGame, record::Record};
use pawnsync_store_sqlite::GameStore;
use tracing::info;

use crate::{Error, Result, error::io_error, files::pgn_files};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  /// Rows added by this import.
  pub inserted:   usize,
  /// Rows in the table afterwards.
  pub total_rows: u64,
}

/// Append one row per `*.pgn` file in `directory`.
///
/// Every file is parsed before anything is written, so a file missing a
/// required tag aborts the import with no rows added. Rows are never
/// deduplicated; importing the same directory twice doubles them.
pub async fn import_games(store: &GameStore, directory: &Path) -> Result<ImportReport> {
  let files = pgn_files(directory).await?;

  let mut games = Vec::with_capacity(files.len());
  for path in files {
    let text = tokio::fs::read_to_string(&path)
      .await
      .map_err(io_error(&path))?;
    let game = Record::parse(text)
      .and_then(|record| NewGame::from_record(&record))
      .map_err(|source| Error::Record { path, source })?;
    games.push(game);
  }

  let inserted = games.len();
  let labels: Vec<String> = games
    .iter()
    .map(|g| format!("{} vs {}", g.white, g.black))
    .collect();

  let ids = store.insert_games(games).await?;
  for (id, label) in ids.iter().zip(&labels) {
    info!(id, game = %label, "inserted");
  }

  Ok(ImportReport {
    inserted,
    total_rows: store.count().await?,
  })
}
