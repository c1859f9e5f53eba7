//! Incremental download of a user's monthly game archives.
//!
//! [`fetch_games`] is the pure step: it takes a [`DownloadHistory`] value,
//! writes game files, and hands back the updated history. [`download`] wraps
//! it with the load/persist lifecycle of the history file.

use std::path::PathBuf;

use pawnsync_core::{
  history::DownloadHistory,
  record::{Record, split_records},
  source::ArchiveSource,
};
use tracing::{debug, info};

use crate::{Error, Result, error::io_error};

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct FetchOptions {
  pub username:            String,
  pub directory:           PathBuf,
  /// Skip games the user lost on time.
  pub exclude_time_losses: bool,
  /// Re-process archives already recorded in the history.
  pub include_previous:    bool,
}

/// Counts from one fetch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
  pub archives_processed: usize,
  pub games_written:      usize,
  pub games_skipped:      usize,
}

impl FetchReport {
  /// True when there was no archive left to process.
  pub fn nothing_to_do(&self) -> bool { self.archives_processed == 0 }
}

/// Download every archive in the work set and write one file per kept game.
///
/// Archives are processed in listing order and each one is added to
/// `history` once all its records are handled, even if none were kept. The
/// first failure aborts the run and the in-flight history is dropped.
pub async fn fetch_games<S>(
  source: &S,
  options: &FetchOptions,
  mut history: DownloadHistory,
) -> Result<(DownloadHistory, FetchReport)>
where
  S: ArchiveSource,
  Error: From<S::Error>,
{
  let dir = &options.directory;
  tokio::fs::create_dir_all(dir).await.map_err(io_error(dir))?;

  let archives = source.list_archives(&options.username).await?;
  let work = history.work_set(&archives, options.include_previous);

  let mut report = FetchReport::default();
  if work.is_empty() {
    info!(username = %options.username, "no new games to download");
    return Ok((history, report));
  }

  for archive_url in work {
    info!(archive = archive_url, "processing archive");
    let blob = source.archive_pgn(archive_url).await?;

    for text in split_records(&blob) {
      let record_error = |source| Error::ArchiveRecord {
        url: archive_url.to_string(),
        source,
      };
      let record = Record::parse(text).map_err(record_error)?;

      if options.exclude_time_losses
        && record
          .is_loss_on_time(&options.username)
          .map_err(record_error)?
      {
        debug!(white = ?record.white().ok(), black = ?record.black().ok(), "skipping loss on time");
        report.games_skipped += 1;
        continue;
      }

      let file_name = record.file_name().map_err(record_error)?;
      let path = dir.join(&file_name);
      tokio::fs::write(&path, record.text())
        .await
        .map_err(io_error(&path))?;
      info!(file = %file_name, "downloaded");
      report.games_written += 1;
    }

    history.insert(archive_url);
    report.archives_processed += 1;
  }

  Ok((history, report))
}

/// Load the user's history, fetch, and persist the updated history.
///
/// The history file is only rewritten after the whole work set succeeds.
pub async fn download<S>(source: &S, options: &FetchOptions) -> Result<FetchReport>
where
  S: ArchiveSource,
  Error: From<S::Error>,
{
  let history = DownloadHistory::load(&options.directory, &options.username)?;
  let (history, report) = fetch_games(source, options, history).await?;

  if !report.nothing_to_do() {
    history.save(&options.directory, &options.username)?;
  }
  Ok(report)
}
