//! Outline and task-tree editing engine for the dayline journal.
//!
//! The crate is split the same way the app is used:
//! - [`models`] holds the plain data (blocks, daily entries, tasks, slash commands).
//! - [`outline`], [`tasks`] and [`slash`] are pure editing engines over those values.
//! - [`storage`] persists whole snapshots behind the [`storage::SnapshotStore`] trait.
//! - [`session`] is the single writer that dispatches commands and saves after each edit.

pub mod error;
pub mod models;
pub mod outline;
pub mod session;
pub mod slash;
pub mod storage;
pub mod tasks;

pub use error::{Error, Result};
pub use session::Session;
