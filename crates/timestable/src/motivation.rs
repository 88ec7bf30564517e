//! Motivational banner every fifth correct answer.

use std::io::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use timestable_engine::{AnswerSet, GameState, PresentError, Presenter, Question};

/// Correct answers between banners.
pub const BANNER_EVERY: u32 = 5;

pub const MESSAGES: [&str; 8] = [
    "You're doing great!",
    "Keep it up!",
    "Math is fun!",
    "You're getting better!",
    "Amazing work!",
    "You're a math star!",
    "Fantastic!",
    "Keep practicing!",
];

/// Shows a random message when a question is asked and the correct count
/// is a positive multiple of [`BANNER_EVERY`].
///
/// Each milestone is shown once: a wrong answer after the fifth correct one
/// asks a new question with the count still at five, and that does not
/// repeat the banner.
pub struct MotivationBanner<W: Write> {
    out: W,
    rng: StdRng,
    correct_answers: u32,
    last_shown: u32,
}

impl<W: Write> MotivationBanner<W> {
    pub fn new(out: W) -> Self {
        Self::from_rng(out, StdRng::from_os_rng())
    }

    pub fn with_seed(out: W, seed: u64) -> Self {
        Self::from_rng(out, StdRng::seed_from_u64(seed))
    }

    fn from_rng(out: W, rng: StdRng) -> Self {
        Self {
            out,
            rng,
            correct_answers: 0,
            last_shown: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for MotivationBanner<W> {
    fn name(&self) -> &'static str {
        "motivation"
    }

    fn on_state_changed(&mut self, state: &GameState) -> Result<(), PresentError> {
        // A fresh round.
        if state.total_questions <= 1 && state.correct_answers == 0 {
            self.last_shown = 0;
        }
        self.correct_answers = state.correct_answers;
        Ok(())
    }

    fn on_question_ready(&mut self, _question: &Question, _answers: &AnswerSet) -> Result<(), PresentError> {
        let count = self.correct_answers;
        if count == 0 || count % BANNER_EVERY != 0 || count == self.last_shown {
            return Ok(());
        }
        self.last_shown = count;

        let message = MESSAGES.choose(&mut self.rng).copied().unwrap_or(MESSAGES[0]);
        writeln!(self.out, "\n  ✨ {message} ✨")
            .and_then(|()| self.out.flush())
            .map_err(|e| PresentError::new("motivation", e.to_string()))
    }
}
