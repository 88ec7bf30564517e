//! The `Presenter` trait: how the engine talks to everything it does not own.
//!
//! Rendering, sound, motivational banners: each is a separate presenter
//! subscribed to the engine. The engine emits typed [`RoundEvent`]s and
//! dispatches them to every subscriber in subscription order; presenters
//! never call back into the engine.

use serde::Serialize;

use crate::{AnswerSet, Feedback, GameState, GameSummary, PresentError, Question};

/// A listener for round events.
///
/// Every callback has a no-op default, so a presenter only implements what
/// it cares about. A returned error is logged by the engine and otherwise
/// ignored: a broken presenter must never stop the round.
pub trait Presenter {
    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "presenter"
    }

    /// Score, lives, time or counters changed.
    fn on_state_changed(&mut self, _state: &GameState) -> Result<(), PresentError> {
        Ok(())
    }

    /// A new question is on screen.
    fn on_question_ready(
        &mut self,
        _question: &Question,
        _answers: &AnswerSet,
    ) -> Result<(), PresentError> {
        Ok(())
    }

    /// The player answered.
    fn on_answer_result(&mut self, _correct: bool, _correct_answer: u32) -> Result<(), PresentError> {
        Ok(())
    }

    /// A wrong answer needs an explanation before the game can continue.
    fn on_feedback_needed(&mut self, _feedback: &Feedback) -> Result<(), PresentError> {
        Ok(())
    }

    /// The round ended. Fires exactly once per round.
    fn on_game_finished(&mut self, _summary: &GameSummary) -> Result<(), PresentError> {
        Ok(())
    }
}

/// Everything the engine can tell a presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoundEvent {
    StateChanged(GameState),
    QuestionReady { question: Question, answers: AnswerSet },
    AnswerResult { correct: bool, correct_answer: u32 },
    FeedbackNeeded(Feedback),
    GameFinished(GameSummary),
}

impl RoundEvent {
    /// Deliver this event to one presenter.
    pub fn deliver(&self, presenter: &mut dyn Presenter) -> Result<(), PresentError> {
        match self {
            Self::StateChanged(state) => presenter.on_state_changed(state),
            Self::QuestionReady { question, answers } => {
                presenter.on_question_ready(question, answers)
            }
            Self::AnswerResult {
                correct,
                correct_answer,
            } => presenter.on_answer_result(*correct, *correct_answer),
            Self::FeedbackNeeded(feedback) => presenter.on_feedback_needed(feedback),
            Self::GameFinished(summary) => presenter.on_game_finished(summary),
        }
    }
}
