//! SQL schema for the games store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Rows are append-only. Nothing issues UPDATE or DELETE, and re-importing a
/// game adds another row.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS games (
    id      INTEGER PRIMARY KEY,
    white   TEXT,
    black   TEXT,
    date    TEXT,
    result  TEXT,
    pgn     TEXT
);

PRAGMA user_version = 1;
";
