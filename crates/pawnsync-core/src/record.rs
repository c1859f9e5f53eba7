//! PGN game records.
//!
//! A bulk PGN download is a sequence of records separated by
//! [`RECORD_SEPARATOR`]. Each record starts with a block of tag pairs
//! (`[Name "Value"]`) followed by movetext. [`Record`] keeps the raw text as
//! the authoritative body and exposes the handful of tags pawnsync cares
//! about as typed views over it.

use std::fmt;

use crate::{Error, Result};

/// Separator between consecutive records in a bulk PGN body.
pub const RECORD_SEPARATOR: &str = "\n\n\n";

/// Split a bulk PGN body into raw record texts.
///
/// Chunks that are empty after trimming are dropped; the remaining chunks
/// are returned verbatim.
pub fn split_records(blob: &str) -> impl Iterator<Item = &str> {
  blob
    .split(RECORD_SEPARATOR)
    .filter(|chunk| !chunk.trim().is_empty())
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// The tags pawnsync reads from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
  White,
  Black,
  Date,
  Result,
  Termination,
}

impl TagName {
  pub const fn as_str(self) -> &'static str {
    match self {
      TagName::White => "White",
      TagName::Black => "Black",
      TagName::Date => "Date",
      TagName::Result => "Result",
      TagName::Termination => "Termination",
    }
  }

  fn from_name(name: &str) -> Option<Self> {
    match name {
      "White" => Some(TagName::White),
      "Black" => Some(TagName::Black),
      "Date" => Some(TagName::Date),
      "Result" => Some(TagName::Result),
      "Termination" => Some(TagName::Termination),
      _ => None,
    }
  }
}

impl fmt::Display for TagName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Tag values found in a record's header block.
///
/// When a tag appears more than once, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
  pub white:       Option<String>,
  pub black:       Option<String>,
  pub date:        Option<String>,
  pub result:      Option<String>,
  pub termination: Option<String>,
  /// Every other tag, in header order.
  pub other:       Vec<(String, String)>,
  /// Header lines that are not a single well-formed tag pair, verbatim.
  pub unparsed:    Vec<String>,
}

impl Tags {
  fn slot(&mut self, tag: TagName) -> &mut Option<String> {
    match tag {
      TagName::White => &mut self.white,
      TagName::Black => &mut self.black,
      TagName::Date => &mut self.date,
      TagName::Result => &mut self.result,
      TagName::Termination => &mut self.termination,
    }
  }

  fn insert(&mut self, name: String, value: String) {
    match TagName::from_name(&name) {
      Some(tag) => {
        let slot = self.slot(tag);
        if slot.is_none() {
          *slot = Some(value);
        }
      }
      None => self.other.push((name, value)),
    }
  }

  pub fn get(&self, tag: TagName) -> Option<&str> {
    let value = match tag {
      TagName::White => &self.white,
      TagName::Black => &self.black,
      TagName::Date => &self.date,
      TagName::Result => &self.result,
      TagName::Termination => &self.termination,
    };
    value.as_deref()
  }

  fn is_empty(&self) -> bool {
    self.white.is_none()
      && self.black.is_none()
      && self.date.is_none()
      && self.result.is_none()
      && self.termination.is_none()
      && self.other.is_empty()
      && self.unparsed.is_empty()
  }
}

/// Parse one `[Name "Value"]` line. Backslash escapes inside the value are
/// resolved. `None` for anything else, including an unescaped quote inside
/// the value or several pairs on one line.
fn parse_tag_pair(line: &str) -> Option<(String, String)> {
  let inner = line.strip_prefix('[')?.strip_suffix(']')?;
  let (name, rest) = inner.trim_start().split_once(char::is_whitespace)?;
  let quoted = rest.trim().strip_prefix('"')?.strip_suffix('"')?;

  let mut value = String::with_capacity(quoted.len());
  let mut chars = quoted.chars();
  while let Some(c) = chars.next() {
    match c {
      '\\' => value.push(chars.next()?),
      '"' => return None,
      c => value.push(c),
    }
  }

  Some((name.to_owned(), value))
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
  White,
  Black,
}

/// Typed view over the `Result` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  WhiteWins,
  BlackWins,
  Draw,
  /// `*` or anything unrecognised.
  Unknown,
}

impl Outcome {
  pub fn from_result(code: &str) -> Self {
    match code.trim() {
      "1-0" => Outcome::WhiteWins,
      "0-1" => Outcome::BlackWins,
      "1/2-1/2" => Outcome::Draw,
      _ => Outcome::Unknown,
    }
  }

  /// Whether `side` lost this game.
  pub fn lost_by(self, side: Side) -> bool {
    matches!(
      (self, side),
      (Outcome::BlackWins, Side::White) | (Outcome::WhiteWins, Side::Black)
    )
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single game: its raw PGN text plus the tags parsed from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
  text: String,
  tags: Tags,
}

impl Record {
  /// Parse the header block of `text`.
  ///
  /// Leading blank lines are skipped; the header ends at the first blank or
  /// non-`[` line after at least one tag pair. Movetext is not interpreted.
  /// A header line that is not a clean tag pair lands in [`Tags::unparsed`];
  /// only asking for a tag it hid can fail.
  pub fn parse(text: impl Into<String>) -> Result<Self> {
    let text = text.into();
    let mut tags = Tags::default();

    for line in text.lines() {
      let line = line.trim();
      if line.is_empty() {
        if tags.is_empty() {
          continue;
        }
        break;
      }
      if !line.starts_with('[') {
        break;
      }
      match parse_tag_pair(line) {
        Some((name, value)) => tags.insert(name, value),
        None => tags.unparsed.push(line.to_owned()),
      }
    }

    Ok(Self { text, tags })
  }

  /// The raw record text, exactly as it was parsed.
  pub fn text(&self) -> &str { &self.text }

  pub fn tags(&self) -> &Tags { &self.tags }

  /// Value of `tag`; an absent or empty value is [`Error::MissingTag`].
  pub fn tag(&self, tag: TagName) -> Result<&str> {
    self
      .tags
      .get(tag)
      .filter(|v| !v.is_empty())
      .ok_or(Error::MissingTag(tag))
  }

  pub fn white(&self) -> Result<&str> { self.tag(TagName::White) }

  pub fn black(&self) -> Result<&str> { self.tag(TagName::Black) }

  pub fn date(&self) -> Result<&str> { self.tag(TagName::Date) }

  pub fn result(&self) -> Result<&str> { self.tag(TagName::Result) }

  pub fn termination(&self) -> Result<&str> { self.tag(TagName::Termination) }

  pub fn outcome(&self) -> Result<Outcome> {
    self.result().map(Outcome::from_result)
  }

  /// Which side `username` played, compared ASCII case-insensitively.
  /// `None` when the user is neither player.
  pub fn side_of(&self, username: &str) -> Result<Option<Side>> {
    if self.white()?.eq_ignore_ascii_case(username) {
      Ok(Some(Side::White))
    } else if self.black()?.eq_ignore_ascii_case(username) {
      Ok(Some(Side::Black))
    } else {
      Ok(None)
    }
  }

  /// True when `username` lost this game and the termination mentions time.
  pub fn is_loss_on_time(&self, username: &str) -> Result<bool> {
    let outcome = self.outcome()?;
    let termination = self.termination()?;
    let Some(side) = self.side_of(username)? else {
      return Ok(false);
    };
    Ok(outcome.lost_by(side) && termination.to_ascii_lowercase().contains("time"))
  }

  /// `{white}_vs_{black}.pgn`. Distinct games between the same players map
  /// to the same name.
  ///
  /// A player name that could leave the target directory is
  /// [`Error::UnsafeFileName`].
  pub fn file_name(&self) -> Result<String> {
    let white = safe_name_part(self.white()?)?;
    let black = safe_name_part(self.black()?)?;
    Ok(format!("{white}_vs_{black}.pgn"))
  }
}

fn safe_name_part(name: &str) -> Result<&str> {
  let unsafe_name = name.is_empty()
    || name == "."
    || name == ".."
    || name.contains(['/', '\\', '\0']);
  if unsafe_name {
    return Err(Error::UnsafeFileName(name.to_owned()));
  }
  Ok(name)
}


#[cfg(test)]
mod tests {
  use super::{test_helpers::pgn, *};

  #[test]
  fn parses_known_and_other_tags() {
    let record = Record::parse(pgn("alice", "bob", "1-0", "alice won by resignation")).unwrap();
    assert_eq!(record.white().unwrap(), "alice");
    assert_eq!(record.black().unwrap(), "bob");
    assert_eq!(record.date().unwrap(), "2024.01.15");
    assert_eq!(record.result().unwrap(), "1-0");
    assert_eq!(record.termination().unwrap(), "alice won by resignation");
    assert_eq!(
      record.tags().other,
      vec![
        ("Event".to_string(), "Live Chess".to_string()),
        ("Site".to_string(), "Chess.com".to_string()),
      ]
    );
  }

  #[test]
  fn text_is_kept_verbatim() {
    let raw = format!("\n{}\n", pgn("a", "b", "*", "unterminated"));
    let record = Record::parse(raw.clone()).unwrap();
    assert_eq!(record.text(), raw);
    assert_eq!(record.white().unwrap(), "a");
  }

  #[test]
  fn missing_tag_names_the_tag() {
    let record = Record::parse("[White \"a\"]\n[Black \"b\"]\n\n1. e4 *").unwrap();
    assert!(matches!(record.date(), Err(Error::MissingTag(TagName::Date))));
    assert!(matches!(
      record.termination(),
      Err(Error::MissingTag(TagName::Termination))
    ));
    assert_eq!(
      record.result().unwrap_err().to_string(),
      "record has no Result tag"
    );
  }

  #[test]
  fn empty_value_counts_as_missing() {
    let record = Record::parse("[White \"\"]\n[Black \"b\"]").unwrap();
    assert!(matches!(record.white(), Err(Error::MissingTag(TagName::White))));
  }

  #[test]
  fn first_occurrence_wins() {
    let record = Record::parse("[White \"first\"]\n[White \"second\"]").unwrap();
    assert_eq!(record.white().unwrap(), "first");
  }

  #[test]
  fn escaped_quotes_in_values() {
    let record = Record::parse(r#"[Event "The \"Big\" One"]"#).unwrap();
    assert_eq!(record.tags().other[0].1, r#"The "Big" One"#);
  }

  #[test]
  fn odd_header_lines_are_kept_aside() {
    let raw = "[Event \"Titled Tuesday \"Blitz\" Arena\"]\n\
               [White \"alice\"]\n\
               [Black \"bob\"]\n\
               [Result \"0-1\"]\n\
               [Termination \"bob won on time\"]\n\
               \n\
               1. e4 e5 0-1";
    let record = Record::parse(raw).unwrap();
    assert_eq!(record.white().unwrap(), "alice");
    assert_eq!(record.black().unwrap(), "bob");
    assert!(record.is_loss_on_time("alice").unwrap());
    assert_eq!(record.tags().unparsed, vec![r#"[Event "Titled Tuesday "Blitz" Arena"]"#]);
    assert!(record.tags().other.is_empty());
  }

  #[test]
  fn unparsable_pairs_only_fail_when_asked_for() {
    let record = Record::parse("[White alice]\n[Site \"x\"] [Date \"2024.01.01\"]\n[Black \"b\"]").unwrap();
    assert_eq!(record.tags().unparsed.len(), 2);
    assert!(matches!(record.white(), Err(Error::MissingTag(TagName::White))));
    assert!(matches!(record.date(), Err(Error::MissingTag(TagName::Date))));
    assert_eq!(record.black().unwrap(), "b");
  }

  #[test]
  fn header_stops_at_movetext() {
    let record = Record::parse("[White \"a\"]\n\n1. e4 {[%clk 0:03:00]} 1-0\n[Black \"b\"]").unwrap();
    assert!(record.black().is_err());
  }

  #[test]
  fn split_yields_each_record() {
    let records = [
      pgn("a", "b", "1-0", "a won by checkmate"),
      pgn("c", "d", "0-1", "d won on time"),
      pgn("e", "f", "1/2-1/2", "drawn by repetition"),
    ];
    let blob = format!("{}\n", records.join(RECORD_SEPARATOR));

    let split: Vec<&str> = split_records(&blob).collect();
    assert_eq!(split.len(), 3);
    assert!(split.iter().all(|r| !r.trim().is_empty()));
    assert_eq!(split[0], records[0]);
    assert_eq!(split[2].trim_end(), records[2]);
  }

  #[test]
  fn split_drops_blank_chunks() {
    let blob = format!("\n\n\n{}\n\n\n   \n\n\n", pgn("a", "b", "1-0", "x"));
    assert_eq!(split_records(&blob).count(), 1);
    assert_eq!(split_records("").count(), 0);
  }

  #[test]
  fn loss_on_time_predicate() {
    let lost = Record::parse(pgn("A", "B", "0-1", "Bob won by time forfeit")).unwrap();
    assert!(lost.is_loss_on_time("A").unwrap());

    let resigned = Record::parse(pgn("A", "B", "0-1", "Bob won by resignation")).unwrap();
    assert!(!resigned.is_loss_on_time("A").unwrap());
  }

  #[test]
  fn loss_on_time_as_black_and_as_winner() {
    let record = Record::parse(pgn("A", "B", "1-0", "A won on Time")).unwrap();
    assert!(record.is_loss_on_time("b").unwrap());
    assert!(!record.is_loss_on_time("A").unwrap());
    assert!(!record.is_loss_on_time("someone-else").unwrap());
  }

  #[test]
  fn loss_on_time_requires_termination() {
    let record = Record::parse("[White \"A\"]\n[Black \"B\"]\n[Result \"0-1\"]").unwrap();
    assert!(matches!(
      record.is_loss_on_time("A"),
      Err(Error::MissingTag(TagName::Termination))
    ));
  }

  #[test]
  fn outcome_codes() {
    assert_eq!(Outcome::from_result("1-0"), Outcome::WhiteWins);
    assert_eq!(Outcome::from_result("0-1"), Outcome::BlackWins);
    assert_eq!(Outcome::from_result("1/2-1/2"), Outcome::Draw);
    assert_eq!(Outcome::from_result("*"), Outcome::Unknown);
  }

  #[test]
  fn file_name_from_players() {
    let record = Record::parse(pgn("hikaru", "magnuscarlsen", "1-0", "x")).unwrap();
    assert_eq!(record.file_name().unwrap(), "hikaru_vs_magnuscarlsen.pgn");
  }

  #[test]
  fn file_name_rejects_path_like_players() {
    for bad in ["../evil", "a/b", "..", "."] {
      let record = Record::parse(pgn(bad, "bob", "1-0", "x")).unwrap();
      assert!(
        matches!(record.file_name(), Err(Error::UnsafeFileName(ref n)) if n == bad),
        "{bad:?} was accepted"
      );
    }
    let backslash = Record::parse(r#"[White "a\\b"]
[Black "bob"]"#).unwrap();
    assert!(matches!(backslash.file_name(), Err(Error::UnsafeFileName(_))));

    let dotted = Record::parse(pgn("a.b", "c..d", "1-0", "x")).unwrap();
    assert_eq!(dotted.file_name().unwrap(), "a.b_vs_c..d.pgn");
  }
}
