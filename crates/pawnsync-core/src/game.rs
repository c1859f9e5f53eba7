//! Row types for the `games` table.

use serde::{Deserialize, Serialize};

use crate::{Result, record::Record};

/// A game ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
  pub white:  String,
  pub black:  String,
  pub date:   String,
  pub result: String,
  pub pgn:    String,
}

impl NewGame {
  /// Extract the columns from `record`. Fails on the first missing tag, so
  /// no partially-filled row can be built.
  pub fn from_record(record: &Record) -> Result<Self> {
    Ok(Self {
      white:  record.white()?.to_owned(),
      black:  record.black()?.to_owned(),
      date:   record.date()?.to_owned(),
      result: record.result()?.to_owned(),
      pgn:    record.text().to_owned(),
    })
  }
}

/// A row read back from the `games` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub id:     i64,
  pub white:  Option<String>,
  pub black:  Option<String>,
  pub date:   Option<String>,
  pub result: Option<String>,
  pub pgn:    Option<String>,
}
