//! Async HTTP client for the chess.com published-data API.

use std::time::Duration;

use pawnsync_core::source::ArchiveSource;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{Error, Result};

/// Connection settings for the games API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:   String,
  pub timeout:    Duration,
  pub user_agent: String,
}

/// Body of `GET /pub/player/{username}/games/archives`.
#[derive(Debug, Deserialize)]
struct ArchiveList {
  archives: Vec<String>,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.as_str())
      .build()
      .map_err(Error::Client)?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
    })
  }

  pub(crate) fn archives_url(&self, username: &str) -> String {
    format!("{}/pub/player/{username}/games/archives", self.base_url)
  }

  /// GET `url`, treating any non-2xx status as an error.
  async fn get(&self, url: &str) -> Result<Response> {
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|source| Error::Http { url: url.to_string(), source })?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        url:    url.to_string(),
        status: resp.status(),
      });
    }
    Ok(resp)
  }
}

pub(crate) fn pgn_url(archive_url: &str) -> String {
  format!("{}/pgn", archive_url.trim_end_matches('/'))
}

impl ArchiveSource for ApiClient {
  type Error = Error;

  /// `GET {base}/pub/player/{username}/games/archives`
  async fn list_archives(&self, username: &str) -> Result<Vec<String>> {
    let url = self.archives_url(username);
    let resp = self.get(&url).await?;
    let list: ArchiveList = resp
      .json()
      .await
      .map_err(|source| Error::Http { url, source })?;
    Ok(list.archives)
  }

  /// `GET {archive_url}/pgn`
  async fn archive_pgn(&self, archive_url: &str) -> Result<String> {
    let url = pgn_url(archive_url);
    let resp = self.get(&url).await?;
    resp.text().await.map_err(|source| Error::Http { url, source })
  }
}
