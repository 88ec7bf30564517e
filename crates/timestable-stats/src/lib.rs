//! Stats persistence for Timestable.
//!
//! Two numbers survive between games: the best score and how many games
//! were played. They live in one small record that is read, updated and
//! written back whole once per finished game.
//!
//! # How it fits in the stack
//!
//! ```text
//! Session (above)  ← records each finished game
//!     ↕
//! Stats (this crate)  ← GameStats + where they are kept (StatsStore)
//! ```
//!
//! The engine never touches this crate.

mod error;
mod file;
mod stats;
mod store;

pub use error::StatsError;
pub use file::{JsonFileStore, STORAGE_KEY};
pub use stats::GameStats;
pub use store::{MemoryStore, StatsStore};
