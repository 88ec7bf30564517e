//! Game state, feedback and end-of-game summary types.

use serde::{Deserialize, Serialize};

use crate::{DifficultyId, Question};

/// The mutable aggregate for one round.
///
/// Owned by a [`RoundEngine`](crate::RoundEngine); presenters only ever see
/// it by reference. `current_question` is `Some` exactly while `active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub difficulty: DifficultyId,
    pub score: u32,
    pub lives: u32,
    pub time_left_secs: u32,
    pub current_question: Option<Question>,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub active: bool,
}

impl GameState {
    /// Fresh state for a new round.
    pub(crate) fn new(difficulty: DifficultyId, lives: u32) -> Self {
        Self {
            difficulty,
            score: 0,
            lives,
            time_left_secs: difficulty.config().time_limit_secs,
            current_question: None,
            correct_answers: 0,
            total_questions: 0,
            active: true,
        }
    }

    /// Correct answers as a whole percentage of questions asked.
    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.correct_answers, self.total_questions)
    }
}

/// `round(correct / total * 100)`, or 0 when nothing was asked.
pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u32
}

/// What the player needs to see after a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub factor_a: u32,
    pub factor_b: u32,
    pub correct_answer: u32,
}

impl From<Question> for Feedback {
    fn from(q: Question) -> Self {
        Self {
            factor_a: q.factor_a,
            factor_b: q.factor_b,
            correct_answer: q.correct_answer,
        }
    }
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The countdown reached zero.
    TimeUp,
    /// The last life was lost and the feedback acknowledged.
    OutOfLives,
    /// The caller ended the game.
    Ended,
}

/// Final numbers of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub difficulty: DifficultyId,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub accuracy_percent: u32,
    pub reason: EndReason,
}

impl GameSummary {
    pub(crate) fn from_state(state: &GameState, reason: EndReason) -> Self {
        Self {
            difficulty: state.difficulty,
            score: state.score,
            correct_answers: state.correct_answers,
            total_questions: state.total_questions,
            accuracy_percent: state.accuracy_percent(),
            reason,
        }
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_accuracy(self.accuracy_percent)
    }

    /// Whether the result deserves a celebration (accuracy of 80% or more).
    pub fn celebrate(&self) -> bool {
        self.accuracy_percent >= 80
    }
}

/// Accuracy band shown on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceTier {
    KeepTrying,
    Good,
    Great,
    Wizard,
}

impl PerformanceTier {
    pub fn from_accuracy(accuracy_percent: u32) -> Self {
        match accuracy_percent {
            90.. => Self::Wizard,
            70..=89 => Self::Great,
            50..=69 => Self::Good,
            _ => Self::KeepTrying,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Wizard => "Perfect! You're a Math Wizard!",
            Self::Great => "Great Job! Keep Practicing!",
            Self::Good => "Good Effort! Try Again!",
            Self::KeepTrying => "Don't Give Up! Practice Makes Perfect!",
        }
    }
}
