//! Settings loaded from an optional TOML file.
//!
//! Command-line flags and `PAWNSYNC_*` environment variables are applied on
//! top of these by the binary; anything left unset falls back to
//! [`Settings::default`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::{Result, client::ClientConfig, error::io_error};

pub const DEFAULT_BASE_URL: &str = "https://api.chess.com";

/// Shape of the config file; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub username:      Option<String>,
  pub directory:     PathBuf,
  pub database:      PathBuf,
  pub merged_output: PathBuf,
  pub base_url:      String,
  pub timeout_secs:  u64,
  pub user_agent:    String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      username:      None,
      directory:     PathBuf::from("./chess_games"),
      database:      PathBuf::from("chess_games.db"),
      merged_output: PathBuf::from("merged_games.pgn"),
      base_url:      DEFAULT_BASE_URL.to_string(),
      timeout_secs:  30,
      user_agent:    concat!("pawnsync/", env!("CARGO_PKG_VERSION")).to_string(),
    }
  }
}

impl Settings {
  pub fn from_toml_str(raw: &str) -> Result<Self> { Ok(toml::from_str(raw)?) }

  /// Read settings from `path`, or return the defaults when no file was
  /// given.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let raw = std::fs::read_to_string(path).map_err(io_error(path))?;
    Self::from_toml_str(&raw)
  }

  pub fn client_config(&self) -> ClientConfig {
    ClientConfig {
      base_url:   self.base_url.clone(),
      timeout:    Duration::from_secs(self.timeout_secs),
      user_agent: self.user_agent.clone(),
    }
  }
}
