//! The `StatsStore` trait: where stats are kept.
//!
//! The session only needs "load the record" and "write it back". Keeping
//! that behind a trait lets the demo write a JSON file while tests (and
//! `--no-save` runs) keep everything in memory.

use crate::{GameStats, StatsError};

/// Loads and saves the [`GameStats`] record.
pub trait StatsStore {
    /// Read the current record. A store with nothing saved yet returns
    /// the default (all zeros).
    fn load(&self) -> Result<GameStats, StatsError>;

    /// Replace the stored record.
    fn save(&mut self, stats: &GameStats) -> Result<(), StatsError>;

    /// Read-modify-write for one finished game: keep the higher score,
    /// count the game, save, and return the updated record.
    fn record_game(&mut self, score: u32) -> Result<GameStats, StatsError> {
        let updated = self.load()?.with_game(score);
        self.save(&updated)?;
        tracing::debug!(
            score,
            best_score = updated.best_score,
            games_played = updated.games_played,
            "game recorded"
        );
        Ok(updated)
    }
}

/// Keeps the record in memory. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stats: GameStats,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts from an existing record.
    pub fn with_stats(stats: GameStats) -> Self {
        Self { stats }
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> Result<GameStats, StatsError> {
        Ok(self.stats)
    }

    fn save(&mut self, stats: &GameStats) -> Result<(), StatsError> {
        self.stats = *stats;
        Ok(())
    }
}
