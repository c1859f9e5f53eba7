//! pawnsync: download chess.com games, load them into SQLite, merge them
//! into one PGN archive.
//!
//! Each operation is a plain async function ([`fetch::download`],
//! [`import::import_games`], [`merge::merge_games`]); the interactive
//! [`shell`] is a thin adapter over them.

// Native `async fn` in traits; the shell's futures are driven on the
// current thread and need no `Send` bound.
#![allow(async_fn_in_trait)]

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod files;
pub mod import;
pub mod merge;
pub mod shell;

pub use error::{Error, Result};
