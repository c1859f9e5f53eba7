//! `pawnsync`, a chess.com game downloader.
//!
//! # Usage
//!
//! ```
//! pawnsync download --username alice --dir ./chess_games --exclude-time-losses
//! pawnsync import --dir ./chess_games --database chess_games.db
//! pawnsync merge --dir ./chess_games --output merged_games.pgn
//! pawnsync                      # interactive menu
//! pawnsync --config ~/.config/pawnsync.toml shell
//! ```

use std::{io, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use pawnsync::{
  client::ApiClient,
  config::Settings,
  fetch::{FetchOptions, download},
  import::import_games,
  merge::merge_games,
  shell::{LiveOperations, Shell},
};
use pawnsync_store_sqlite::GameStore;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pawnsync", version, about = "Download, store and merge chess.com games")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, global = true, value_name = "FILE", env = "PAWNSYNC_CONFIG")]
  config: Option<PathBuf>,

  /// Base URL of the games API (default: https://api.chess.com).
  #[arg(long, global = true, env = "PAWNSYNC_BASE_URL")]
  base_url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Download new games for a user, one PGN file per game.
  Download {
    #[arg(short, long, env = "PAWNSYNC_USERNAME")]
    username: Option<String>,

    /// Directory to write games and the download history into.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Skip games the user lost on time.
    #[arg(long)]
    exclude_time_losses: bool,

    /// Re-download archives already in the history.
    #[arg(long)]
    include_previous: bool,
  },

  /// Append every PGN file in a directory to the SQLite database.
  Import {
    #[arg(short, long)]
    dir: Option<PathBuf>,

    #[arg(long, env = "PAWNSYNC_DATABASE")]
    database: Option<PathBuf>,
  },

  /// Concatenate every PGN file in a directory into one file.
  Merge {
    #[arg(short, long)]
    dir: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Interactive menu (the default).
  Shell,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  // CLI flags override the config file, which overrides defaults.
  let mut settings = Settings::load(cli.config.as_deref()).context("loading config")?;
  if let Some(url) = cli.base_url {
    settings.base_url = url;
  }

  match cli.command.unwrap_or(Command::Shell) {
    Command::Download {
      username,
      dir,
      exclude_time_losses,
      include_previous,
    } => {
      let username = username
        .or_else(|| settings.username.clone())
        .ok_or_else(|| anyhow!("a username is required (--username or config `username`)"))?;
      let client = ApiClient::new(&settings.client_config())?;
      let options = FetchOptions {
        username,
        directory: dir.unwrap_or_else(|| settings.directory.clone()),
        exclude_time_losses,
        include_previous,
      };

      let report = download(&client, &options)
        .await
        .with_context(|| format!("downloading games for {}", options.username))?;
      if !report.nothing_to_do() {
        info!(
          archives = report.archives_processed,
          written = report.games_written,
          skipped = report.games_skipped,
          "download complete"
        );
      }
    }

    Command::Import { dir, database } => {
      let dir = dir.unwrap_or_else(|| settings.directory.clone());
      let database = database.unwrap_or_else(|| settings.database.clone());

      let store = GameStore::open(&database)
        .await
        .with_context(|| format!("opening database {}", database.display()))?;
      let report = import_games(&store, &dir)
        .await
        .with_context(|| format!("importing {}", dir.display()))?;
      info!(
        inserted = report.inserted,
        total = report.total_rows,
        "all games inserted into the database"
      );
    }

    Command::Merge { dir, output } => {
      let dir = dir.unwrap_or_else(|| settings.directory.clone());
      let output = output.unwrap_or_else(|| settings.merged_output.clone());

      merge_games(&dir, &output)
        .await
        .with_context(|| format!("merging {} into {}", dir.display(), output.display()))?;
    }

    Command::Shell => {
      let ops = LiveOperations {
        client: ApiClient::new(&settings.client_config())?,
      };
      let stdin = io::stdin();
      let mut shell = Shell::new(stdin.lock(), io::stdout());
      shell
        .run(&ops, &settings)
        .await
        .context("interactive session")?;
    }
  }

  Ok(())
}
