//! Round state machine for the Timestable multiplication quiz.
//!
//! A [`RoundEngine`] owns one game: it draws questions from the chosen
//! difficulty, builds the multiple-choice options, checks answers, keeps
//! score and lives, and decides when the game is over. It knows nothing
//! about screens or sound; those subscribe as [`Presenter`]s.
//!
//! # Key types
//!
//! - [`RoundEngine`]: the state machine, driven by input, ticks and
//!   deferred advances
//! - [`RoundPhase`]: where the engine is in its lifecycle
//! - [`DifficultyId`] / [`DifficultyConfig`]: the three presets
//! - [`Question`] / [`AnswerSet`]: what the player sees
//! - [`GameState`] / [`GameSummary`]: live numbers and final result
//! - [`Presenter`] / [`RoundEvent`]: outbound notifications

mod config;
mod difficulty;
mod engine;
mod error;
mod presenter;
mod question;
mod state;

pub use config::{EngineConfig, RoundOutcome, RoundPhase};
pub use difficulty::{DifficultyConfig, DifficultyId, EASY, HARD, MEDIUM};
pub use engine::{AdvanceToken, AnswerOutcome, RoundEngine};
pub use error::{EngineError, PresentError};
pub use presenter::{Presenter, RoundEvent};
pub use question::{ANSWER_OPTIONS, AnswerSet, Question};
pub use state::{EndReason, Feedback, GameState, GameSummary, PerformanceTier, accuracy_percent};
