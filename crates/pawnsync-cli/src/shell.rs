//! Interactive prompt: asks for the session values once, then loops over a
//! download / import / merge / exit menu.
//!
//! The shell only parses answers and prints results. The work itself goes
//! through [`Operations`], so the prompt can be driven with scripted input
//! in tests.

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
};

use pawnsync_core::history::DownloadHistory;
use pawnsync_store_sqlite::GameStore;

use crate::{
  Result,
  client::ApiClient,
  config::Settings,
  fetch::{FetchOptions, FetchReport, download},
  import::{ImportReport, import_games},
  merge::{MergeReport, merge_games},
};

/// Values collected once at the start of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub username:      String,
  pub directory:     PathBuf,
  pub database:      PathBuf,
  pub merged_output: PathBuf,
}

/// The actions behind the menu entries.
pub trait Operations {
  /// Whether a download history already exists for this session's user.
  fn has_history(&self, session: &Session) -> bool;

  async fn download(
    &self,
    session: &Session,
    exclude_time_losses: bool,
    include_previous: bool,
  ) -> Result<FetchReport>;

  async fn import(&self, session: &Session) -> Result<ImportReport>;

  async fn merge(&self, session: &Session) -> Result<MergeReport>;
}

/// [`Operations`] against the real API, filesystem and database.
pub struct LiveOperations {
  pub client: ApiClient,
}

impl Operations for LiveOperations {
  fn has_history(&self, session: &Session) -> bool {
    DownloadHistory::exists(&session.directory, &session.username)
  }

  async fn download(
    &self,
    session: &Session,
    exclude_time_losses: bool,
    include_previous: bool,
  ) -> Result<FetchReport> {
    let options = FetchOptions {
      username: session.username.clone(),
      directory: session.directory.clone(),
      exclude_time_losses,
      include_previous,
    };
    download(&self.client, &options).await
  }

  async fn import(&self, session: &Session) -> Result<ImportReport> {
    let store = GameStore::open(&session.database).await?;
    import_games(&store, &session.directory).await
  }

  async fn merge(&self, session: &Session) -> Result<MergeReport> {
    merge_games(&session.directory, &session.merged_output).await
  }
}

fn is_yes(answer: &str) -> bool { answer.trim().eq_ignore_ascii_case("yes") }

/// Line-oriented prompt over any reader/writer pair.
pub struct Shell<R, W> {
  input:  R,
  output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
  pub fn new(input: R, output: W) -> Self { Self { input, output } }

  pub fn into_output(self) -> W { self.output }

  /// Print `message` and read one trimmed line. `None` at end of input.
  fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
    write!(self.output, "{message}")?;
    self.output.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
  }

  /// Prompt for a path, falling back to `default` on an empty answer.
  fn prompt_path(
    &mut self,
    message: &str,
    example: &str,
    default: &Path,
  ) -> io::Result<Option<PathBuf>> {
    let message = format!("{message}\n(e.g., {example}) [{}]: ", default.display());
    Ok(self.prompt(&message)?.map(|answer| {
      if answer.is_empty() {
        default.to_path_buf()
      } else {
        PathBuf::from(answer)
      }
    }))
  }

  /// Ask for the session values. `None` if input ends first.
  pub fn collect_session(&mut self, defaults: &Settings) -> io::Result<Option<Session>> {
    let username = loop {
      let message = match &defaults.username {
        Some(name) => format!("Enter your chess.com username\n(e.g., johndoe) [{name}]: "),
        None => "Enter your chess.com username\n(e.g., johndoe): ".to_string(),
      };
      let Some(answer) = self.prompt(&message)? else {
        return Ok(None);
      };
      match (answer.is_empty(), &defaults.username) {
        (false, _) => break answer,
        (true, Some(name)) => break name.clone(),
        (true, None) => writeln!(self.output, "A username is required.")?,
      }
    };

    let Some(directory) =
      self.prompt_path("Enter the directory to save games", "./chess_games", &defaults.directory)?
    else {
      return Ok(None);
    };
    let Some(database) =
      self.prompt_path("Enter the database path", "chess_games.db", &defaults.database)?
    else {
      return Ok(None);
    };
    let Some(merged_output) = self.prompt_path(
      "Enter the output file path for merged PGN",
      "merged_games.pgn",
      &defaults.merged_output,
    )?
    else {
      return Ok(None);
    };

    Ok(Some(Session {
      username,
      directory,
      database,
      merged_output,
    }))
  }

  /// Run the whole interactive session until the user exits or input ends.
  ///
  /// Errors from an operation are printed and the menu comes back; only
  /// I/O errors on the prompt itself end the session.
  pub async fn run<O: Operations>(&mut self, ops: &O, defaults: &Settings) -> io::Result<()> {
    writeln!(self.output, "Welcome to the chess.com game utility!")?;

    let Some(session) = self.collect_session(defaults)? else {
      return Ok(());
    };

    loop {
      writeln!(self.output)?;
      writeln!(self.output, "Select an action:")?;
      writeln!(self.output, "1. Download games")?;
      writeln!(self.output, "2. Insert games into database")?;
      writeln!(self.output, "3. Merge PGN files")?;
      writeln!(self.output, "4. Exit")?;

      let Some(choice) = self.prompt("Enter choice (1/2/3/4): ")? else {
        break;
      };

      match choice.as_str() {
        "1" => {
          let include_previous = if ops.has_history(&session) {
            writeln!(self.output, "\nPreviously downloaded games found!")?;
            let Some(answer) =
              self.prompt("Do you want to include previously downloaded games? (yes/no): ")?
            else {
              break;
            };
            is_yes(&answer)
          } else {
            // First download for this user.
            true
          };
          let Some(answer) = self.prompt("Exclude games lost by time? (yes/no): ")? else {
            break;
          };

          match ops.download(&session, is_yes(&answer), include_previous).await {
            Ok(report) if report.nothing_to_do() => {
              writeln!(self.output, "No new games to download!")?
            }
            Ok(report) => writeln!(
              self.output,
              "Downloaded {} games from {} archives ({} skipped).",
              report.games_written, report.archives_processed, report.games_skipped
            )?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
          }
        }
        "2" => match ops.import(&session).await {
          Ok(report) => writeln!(
            self.output,
            "All games inserted into the database ({} new, {} total).",
            report.inserted, report.total_rows
          )?,
          Err(e) => writeln!(self.output, "Error: {e}")?,
        },
        "3" => match ops.merge(&session).await {
          Ok(report) => writeln!(
            self.output,
            "All {} games merged into {}",
            report.merged,
            session.merged_output.display()
          )?,
          Err(e) => writeln!(self.output, "Error: {e}")?,
        },
        "4" => {
          writeln!(self.output, "Exiting program. Goodbye!")?;
          break;
        }
        _ => writeln!(self.output, "Invalid choice. Please try again.")?,
      }
    }

    Ok(())
  }
}
