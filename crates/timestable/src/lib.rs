//! # Timestable
//!
//! A timed multiplication quiz for the terminal.
//!
//! The game itself lives in [`timestable_engine`]: a synchronous round
//! engine that knows nothing about screens or sound. This crate puts a
//! terminal around it. Player input is parsed into [`Command`]s, the
//! engine's events are rendered by [`TerminalPresenter`], cheered on by
//! [`MotivationBanner`] and [`BellCue`], and [`QuizSession`] runs the event
//! loop and keeps the best-score record.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use timestable::prelude::*;
//!
//! # async fn demo() -> Result<(), TimestableError> {
//! let config = EngineConfig::default();
//! let mut engine = RoundEngine::new(config.clone(), IntervalClock::default());
//! engine.subscribe(Box::new(TerminalPresenter::new(std::io::stdout(), config.progress_target)));
//!
//! let mut session = QuizSession::new(engine, MemoryStore::new(), std::io::stdout());
//! session.run(tokio::io::BufReader::new(tokio::io::stdin())).await
//! # }
//! ```

mod bell;
mod command;
mod error;
mod motivation;
pub mod render;
mod session;

pub use bell::BellCue;
pub use command::{Command, CommandError, HELP};
pub use error::TimestableError;
pub use motivation::{BANNER_EVERY, MESSAGES, MotivationBanner};
pub use render::TerminalPresenter;
pub use session::{Flow, QuizSession, Screen};

/// Everything needed to wire up a game.
pub mod prelude {
    pub use crate::{
        BellCue, Command, Flow, MotivationBanner, QuizSession, Screen, TerminalPresenter,
        TimestableError,
    };
    pub use timestable_engine::{
        DifficultyId, EngineConfig, GameState, GameSummary, Presenter, RoundEngine,
    };
    pub use timestable_stats::{GameStats, JsonFileStore, MemoryStore, StatsStore};
    pub use timestable_tick::{Clock, IntervalClock, TickConfig};
}
