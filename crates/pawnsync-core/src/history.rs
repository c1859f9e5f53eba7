//! Download history: the set of archive URLs already fully processed for a
//! user.
//!
//! Persisted as a JSON array of URL strings at
//! `{directory}/{username}_download_history.json`. The value is loaded by the
//! caller, threaded through a fetch, and saved back in full afterwards.

use std::{
  collections::BTreeSet,
  fs,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadHistory {
  archives: BTreeSet<String>,
}

impl DownloadHistory {
  pub fn new() -> Self { Self::default() }

  /// Location of the history file for `username` inside `directory`.
  pub fn file_path(directory: &Path, username: &str) -> PathBuf {
    directory.join(format!("{username}_download_history.json"))
  }

  pub fn exists(directory: &Path, username: &str) -> bool {
    Self::file_path(directory, username).is_file()
  }

  /// Load the history for `username`; a missing file is an empty history.
  pub fn load(directory: &Path, username: &str) -> Result<Self> {
    let path = Self::file_path(directory, username);
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
      Err(source) => return Err(Error::Io { path, source }),
    };
    Ok(serde_json::from_str(&raw)?)
  }

  /// Replace the history file for `username` with this set.
  ///
  /// Written to a sibling temp file and renamed into place, so a crash never
  /// leaves a truncated history behind.
  pub fn save(&self, directory: &Path, username: &str) -> Result<()> {
    let path = Self::file_path(directory, username);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(self)?;

    fs::write(&tmp, json).map_err(|source| Error::Io {
      path: tmp.clone(),
      source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| Error::Io { path, source })
  }

  pub fn contains(&self, archive_url: &str) -> bool {
    self.archives.contains(archive_url)
  }

  /// Record `archive_url` as processed. Returns `false` if it already was.
  pub fn insert(&mut self, archive_url: impl Into<String>) -> bool {
    self.archives.insert(archive_url.into())
  }

  pub fn len(&self) -> usize { self.archives.len() }

  pub fn is_empty(&self) -> bool { self.archives.is_empty() }

  /// The archives a fetch should process, in listing order: every archive
  /// when `include_previous` is set, otherwise only those not yet recorded.
  pub fn work_set<'a>(&self, archives: &'a [String], include_previous: bool) -> Vec<&'a str> {
    archives
      .iter()
      .map(String::as_str)
      .filter(|url| include_previous || !self.contains(url))
      .collect()
  }
}

impl<S: Into<String>> FromIterator<S> for DownloadHistory {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self {
      archives: iter.into_iter().map(Into::into).collect(),
    }
  }
}
