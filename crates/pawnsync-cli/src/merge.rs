//! Concatenating game files into one PGN archive.

use std::path::Path;

use pawnsync_core::record::RECORD_SEPARATOR;
use tracing::{debug, info};

use crate::{Result, error::io_error, files::pgn_files};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
  pub merged: usize,
}

/// Write every `*.pgn` file in `directory` to `output`, separated by
/// [`RECORD_SEPARATOR`], replacing any existing output file.
///
/// Trailing whitespace of each file is dropped so the separator stays
/// exact. Files holding only whitespace are skipped. If `output` itself
/// lives in `directory` it is not merged into itself.
pub async fn merge_games(directory: &Path, output: &Path) -> Result<MergeReport> {
  let output_canonical = tokio::fs::canonicalize(output).await.ok();

  let mut records = Vec::new();
  for path in pgn_files(directory).await? {
    if output_canonical.is_some()
      && tokio::fs::canonicalize(&path).await.ok() == output_canonical
    {
      continue;
    }
    let text = tokio::fs::read_to_string(&path)
      .await
      .map_err(io_error(&path))?;
    let text = text.trim_end();
    if text.is_empty() {
      debug!(file = %path.display(), "skipping blank file");
      continue;
    }
    info!(file = %path.display(), "merged");
    records.push(text.to_string());
  }

  let mut merged = records.join(RECORD_SEPARATOR);
  if !merged.is_empty() {
    merged.push('\n');
  }
  tokio::fs::write(output, merged)
    .await
    .map_err(io_error(output))?;

  info!(output = %output.display(), count = records.len(), "all games merged");
  Ok(MergeReport {
    merged: records.len(),
  })
}

#[cfg(test)]
mod tests {
  use pawnsync_core::record::split_records;

  use super::*;
  use crate::fetch::test_helpers::pgn;

  #[tokio::test]
  async fn joins_with_two_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let a = pgn("A", "B", "1-0", "A won by resignation");
    let b = pgn("C", "D", "0-1", "D won on time");
    std::fs::write(dir.path().join("A_vs_B.pgn"), &a).unwrap();
    std::fs::write(dir.path().join("C_vs_D.pgn"), format!("{b}\n")).unwrap();

    let out = dir.path().join("merged.txt");
    let report = merge_games(dir.path(), &out).await.unwrap();

    assert_eq!(report.merged, 2);
    let merged = std::fs::read_to_string(&out).unwrap();
    assert_eq!(merged, format!("{a}\n\n\n{b}\n"));
  }

  #[tokio::test]
  async fn merged_output_splits_back_into_the_files() {
    let dir = tempfile::tempdir().unwrap();
    let texts: Vec<String> = (0..5)
      .map(|i| pgn(&format!("w{i}"), &format!("b{i}"), "1/2-1/2", "drawn"))
      .collect();
    for (i, text) in texts.iter().enumerate() {
      std::fs::write(dir.path().join(format!("w{i}_vs_b{i}.pgn")), format!("{text}\n\n")).unwrap();
    }

    let out = dir.path().join("all.pgn");
    merge_games(dir.path(), &out).await.unwrap();
    let merged = std::fs::read_to_string(&out).unwrap();

    let split: Vec<&str> = split_records(&merged).map(str::trim_end).collect();
    assert_eq!(split, texts);
  }

  #[tokio::test]
  async fn output_is_overwritten_and_not_merged_into_itself() {
    let dir = tempfile::tempdir().unwrap();
    let a = pgn("A", "B", "1-0", "x");
    std::fs::write(dir.path().join("A_vs_B.pgn"), &a).unwrap();

    let out = dir.path().join("merged.pgn");
    std::fs::write(&out, "stale contents").unwrap();

    merge_games(dir.path(), &out).await.unwrap();
    let report = merge_games(dir.path(), &out).await.unwrap();

    assert_eq!(report.merged, 1);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), format!("{a}\n"));
  }

  #[tokio::test]
  async fn blank_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let games = [
      pgn("a", "b", "1-0", "a won by resignation"),
      pgn("c", "d", "0-1", "d won on time"),
    ];
    std::fs::write(dir.path().join("a_vs_b.pgn"), &games[0]).unwrap();
    std::fs::write(dir.path().join("b_blank.pgn"), " \n\n\t\n").unwrap();
    std::fs::write(dir.path().join("c_vs_d.pgn"), &games[1]).unwrap();
    std::fs::write(dir.path().join("d_empty.pgn"), "").unwrap();
    let output = dir.path().join("out.merged");

    let report = merge_games(dir.path(), &output).await.unwrap();
    assert_eq!(report.merged, 2);

    let merged = std::fs::read_to_string(&output).unwrap();
    assert!(!merged.contains("\n\n\n\n"));
    let split: Vec<&str> = split_records(&merged).map(str::trim_end).collect();
    assert_eq!(split, vec![games[0].as_str(), games[1].as_str()]);
  }

  #[tokio::test]
  async fn empty_directory_gives_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pgn");
    let report = merge_games(&dir.path().join("."), &out).await.unwrap();
    assert_eq!(report.merged, 0);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
  }
}
