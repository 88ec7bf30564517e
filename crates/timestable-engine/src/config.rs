//! Engine configuration and the round phase machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Tunables that are the same for every difficulty.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Lives at the start of a round.
    pub starting_lives: u32,

    /// Pause between a correct answer and the next question. The engine
    /// does not wait itself; callers schedule [`RoundEngine::advance`]
    /// after this delay.
    ///
    /// [`RoundEngine::advance`]: crate::RoundEngine::advance
    pub advance_delay: Duration,

    /// Countdown resolution. One tick removes one second.
    pub tick_interval: Duration,

    /// Correct answers that fill the progress bar.
    pub progress_target: u32,

    /// Wrong options are drawn from `correct ± variation`.
    pub variation: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            advance_delay: Duration::from_millis(1500),
            tick_interval: Duration::from_secs(1),
            progress_target: 20,
            variation: 5,
        }
    }
}

impl EngineConfig {
    /// Replace degenerate values so the config is safe to use.
    ///
    /// Called automatically by [`RoundEngine::new`](crate::RoundEngine::new).
    /// Zero lives, a zero tick interval, a zero progress target or a zero
    /// variation fall back to the defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.starting_lives == 0 {
            warn!("starting_lives is 0, using default");
            self.starting_lives = defaults.starting_lives;
        }
        if self.tick_interval.is_zero() {
            warn!("tick_interval is zero, using default");
            self.tick_interval = defaults.tick_interval;
        }
        if self.progress_target == 0 {
            self.progress_target = defaults.progress_target;
        }
        if self.variation == 0 {
            self.variation = defaults.variation;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// RoundPhase
// ---------------------------------------------------------------------------

/// How the current question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct,
    Incorrect,
}

/// Where the engine is in its lifecycle.
///
/// ```text
/// Idle → Active → RoundOver(Correct | Incorrect) → Active
///                                                 ↘ Finished
/// ```
///
/// - **Idle**: no game. Initial phase, and the phase after returning to
///   the menu.
/// - **Active**: a question is on screen and accepts exactly one answer.
/// - **RoundOver**: the question was answered. After a correct answer the
///   next question comes from a deferred `advance`; after an incorrect one
///   the player has to acknowledge the feedback.
/// - **Finished**: the game is over (time up, out of lives, or ended).
///   Terminal until the next `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Active,
    RoundOver(RoundOutcome),
    Finished,
}

impl RoundPhase {
    /// Returns `true` while a game is running (a question exists).
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::Active | Self::RoundOver(_))
    }

    /// Returns `true` if an answer would be accepted.
    pub fn accepts_answer(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if feedback is waiting to be acknowledged.
    pub fn awaits_acknowledge(&self) -> bool {
        matches!(self, Self::RoundOver(RoundOutcome::Incorrect))
    }

    /// Returns `true` once the game has ended.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
            Self::RoundOver(RoundOutcome::Correct) => write!(f, "RoundOver(Correct)"),
            Self::RoundOver(RoundOutcome::Incorrect) => write!(f, "RoundOver(Incorrect)"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
