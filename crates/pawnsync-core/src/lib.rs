//! Core types for pawnsync: PGN records, download history and the
//! [`ArchiveSource`](source::ArchiveSource) abstraction over the remote API.
//!
//! This crate does no HTTP and no database work. The store and CLI crates
//! depend on it.

pub mod error;
pub mod game;
pub mod history;
pub mod record;
pub mod source;

pub use error::{Error, Result};
