//! [`GameStore`]: the `games` table in a single SQLite file.

use std::path::Path;

use pawnsync_core::game::{Game, NewGame};

use crate::{Result, schema::SCHEMA};

const INSERT_GAME: &str = "INSERT INTO games (white, black, date, result, pgn)
                           VALUES (?1, ?2, ?3, ?4, ?5)";

/// An append-only store of imported games.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct GameStore {
  conn: tokio_rusqlite::Connection,
}

impl GameStore {
  /// Open (or create) a store at `path` and create the `games` table if it
  /// is absent.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Append one game and return its assigned id.
  pub async fn insert_game(&self, game: NewGame) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(INSERT_GAME)?;
        let id = stmt.insert(rusqlite::params![
          game.white,
          game.black,
          game.date,
          game.result,
          game.pgn,
        ])?;
        Ok(id)
      })
      .await?;
    Ok(id)
  }

  /// Append a batch of games in one transaction. Either every row lands or
  /// none do. Ids are returned in input order.
  pub async fn insert_games(&self, games: Vec<NewGame>) -> Result<Vec<i64>> {
    let ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(games.len());
        {
          let mut stmt = tx.prepare(INSERT_GAME)?;
          for game in &games {
            ids.push(stmt.insert(rusqlite::params![
              game.white,
              game.black,
              game.date,
              game.result,
              game.pgn,
            ])?);
          }
        }
        tx.commit()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }

  /// Number of rows in the `games` table.
  pub async fn count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM games", [], |r| r.get(0))?))
      .await?;
    Ok(count as u64)
  }

  /// Every row, in id order.
  pub async fn list(&self) -> Result<Vec<Game>> {
    let games = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, white, black, date, result, pgn FROM games ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Game {
              id:     row.get(0)?,
              white:  row.get(1)?,
              black:  row.get(2)?,
              date:   row.get(3)?,
              result: row.get(4)?,
              pgn:    row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(games)
  }
}
