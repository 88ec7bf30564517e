//! The round engine: owns one game and walks it through its phases.
//!
//! Everything is synchronous. The engine is driven from outside by exactly
//! three sources (player input, clock ticks, the deferred advance after a
//! correct answer) and handles one call to completion before the next.
//! Calls that arrive in the wrong phase are dropped with a debug log.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use timestable_tick::Clock;
use tracing::{debug, info, trace};

use crate::{
    AnswerSet, DifficultyId, EndReason, EngineConfig, Feedback, GameState, GameSummary, Presenter,
    Question, RoundEvent, RoundOutcome, RoundPhase,
};

/// Handle for the deferred "next question" after a correct answer.
///
/// Carries the round generation and the question number it was issued
/// for. If the game was ended, restarted or moved on in the meantime the
/// token no longer matches and [`RoundEngine::advance`] ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceToken {
    generation: u64,
    question: u32,
}

/// Result of [`RoundEngine::submit_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Points were awarded. Schedule `advance(token)` after the
    /// configured delay.
    Correct { points: u32, token: AdvanceToken },
    /// A life was lost. Wait for `acknowledge_feedback`.
    Incorrect { feedback: Feedback, lives_left: u32 },
    /// No question was accepting answers.
    Ignored,
}

/// The multiplication quiz state machine.
///
/// One engine runs one game at a time. It owns the [`GameState`], the
/// random source, and the clock; presenters subscribe to its events.
pub struct RoundEngine<C: Clock> {
    config: EngineConfig,
    clock: C,
    rng: ChaCha8Rng,
    phase: RoundPhase,
    state: Option<GameState>,
    answers: Option<AnswerSet>,
    last_difficulty: Option<DifficultyId>,
    last_summary: Option<GameSummary>,
    /// Bumped on every start and return to menu; invalidates advance tokens.
    generation: u64,
    presenters: Vec<Box<dyn Presenter>>,
}

impl<C: Clock> RoundEngine<C> {
    /// Create an idle engine seeded from the operating system.
    pub fn new(config: EngineConfig, clock: C) -> Self {
        Self::from_rng(config, clock, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Create an idle engine with a fixed seed. Same seed, same questions,
    /// on every platform and `rand` release (ChaCha8 is a portable stream).
    pub fn with_seed(config: EngineConfig, clock: C, seed: u64) -> Self {
        Self::from_rng(config, clock, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(config: EngineConfig, clock: C, rng: ChaCha8Rng) -> Self {
        Self {
            config: config.validated(),
            clock,
            rng,
            phase: RoundPhase::Idle,
            state: None,
            answers: None,
            last_difficulty: None,
            last_summary: None,
            generation: 0,
            presenters: Vec::new(),
        }
    }

    /// Add a presenter. Events are delivered in subscription order.
    pub fn subscribe(&mut self, presenter: Box<dyn Presenter>) {
        debug!(presenter = presenter.name(), "presenter subscribed");
        self.presenters.push(presenter);
    }

    // -----------------------------------------------------------------------
    // Inbound operations
    // -----------------------------------------------------------------------

    /// Start a new round at `difficulty`.
    ///
    /// Stops any running clock first, resets the state, asks the first
    /// question and starts the countdown. A round still in progress is
    /// abandoned without a summary.
    pub fn start(&mut self, difficulty: DifficultyId) {
        self.clock.stop();
        if self.phase.is_in_game() {
            debug!(phase = %self.phase, "abandoning round in progress");
        }

        self.generation += 1;
        self.state = Some(GameState::new(difficulty, self.config.starting_lives));
        self.answers = None;
        self.last_summary = None;
        self.last_difficulty = Some(difficulty);
        self.phase = RoundPhase::Active;

        info!(%difficulty, generation = self.generation, "game started");

        self.generate_question();
        self.clock.start(self.config.tick_interval);
    }

    /// Start again at the last difficulty played. Returns `false` if no
    /// game has been started yet.
    pub fn restart(&mut self) -> bool {
        match self.last_difficulty {
            Some(difficulty) => {
                self.start(difficulty);
                true
            }
            None => {
                debug!("restart ignored, no previous game");
                false
            }
        }
    }

    /// One second passed. Ends the round when the countdown hits zero.
    pub fn tick(&mut self) {
        if !self.phase.is_in_game() {
            trace!(phase = %self.phase, "stale tick ignored");
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.time_left_secs = state.time_left_secs.saturating_sub(1);
        let time_left = state.time_left_secs;
        trace!(time_left, "tick");

        self.emit_state();
        if time_left == 0 {
            self.finish(EndReason::TimeUp);
        }
    }

    /// Ask a new question.
    ///
    /// Requires a running game that is not waiting on feedback. Counts the
    /// question, builds its answer set and notifies presenters. Returns the
    /// new question, or `None` if there is no running game or a wrong
    /// answer has not been acknowledged yet.
    pub fn generate_question(&mut self) -> Option<Question> {
        if !self.phase.is_in_game() || self.phase.awaits_acknowledge() {
            debug!(phase = %self.phase, "generate_question ignored");
            return None;
        }
        let state = self.state.as_mut().filter(|s| s.active)?;

        let config = state.difficulty.config();
        let question = Question::generate(&config.table_range, &mut self.rng);
        let answers = AnswerSet::generate(question.correct_answer, self.config.variation, &mut self.rng);

        state.current_question = Some(question);
        state.total_questions += 1;
        let correct_answers = state.correct_answers;
        let number = state.total_questions;
        self.answers = Some(answers);
        self.phase = RoundPhase::Active;

        debug!(number, %question, correct_answers, "question ready");

        self.emit_state();
        self.emit(RoundEvent::QuestionReady { question, answers });
        Some(question)
    }

    /// Answer the current question with `value`.
    ///
    /// Only the first answer per question counts; anything after that is
    /// [`AnswerOutcome::Ignored`] until the next question.
    pub fn submit_answer(&mut self, value: u32) -> AnswerOutcome {
        if !self.phase.accepts_answer() {
            debug!(phase = %self.phase, value, "answer ignored");
            return AnswerOutcome::Ignored;
        }
        let Some(state) = self.state.as_mut() else {
            return AnswerOutcome::Ignored;
        };
        let Some(question) = state.current_question else {
            return AnswerOutcome::Ignored;
        };

        if value == question.correct_answer {
            let points = state.difficulty.config().points_per_correct;
            state.score += points;
            state.correct_answers += 1;
            let token = AdvanceToken {
                generation: self.generation,
                question: state.total_questions,
            };
            self.phase = RoundPhase::RoundOver(RoundOutcome::Correct);
            debug!(value, points, score = state.score, "correct answer");

            self.emit(RoundEvent::AnswerResult {
                correct: true,
                correct_answer: question.correct_answer,
            });
            self.emit_state();
            AnswerOutcome::Correct { points, token }
        } else {
            state.lives = state.lives.saturating_sub(1);
            let lives_left = state.lives;
            let feedback = Feedback::from(question);
            self.phase = RoundPhase::RoundOver(RoundOutcome::Incorrect);
            debug!(value, expected = question.correct_answer, lives_left, "wrong answer");

            self.emit(RoundEvent::AnswerResult {
                correct: false,
                correct_answer: question.correct_answer,
            });
            self.emit(RoundEvent::FeedbackNeeded(feedback));
            self.emit_state();
            AnswerOutcome::Incorrect { feedback, lives_left }
        }
    }

    /// Answer with the option in 1-based `slot` (keys 1–4).
    pub fn submit_slot(&mut self, slot: usize) -> AnswerOutcome {
        match self.answers.and_then(|answers| answers.slot(slot)) {
            Some(value) => self.submit_answer(value),
            None => {
                debug!(slot, "no option in slot, ignored");
                AnswerOutcome::Ignored
            }
        }
    }

    /// The deferred callback after a correct answer: ask the next question.
    ///
    /// Does nothing (and returns `false`) if the token is stale: the game
    /// ended, was restarted, or already moved on.
    pub fn advance(&mut self, token: AdvanceToken) -> bool {
        let current = self.state.as_ref().map(|s| s.total_questions);
        let fresh = self.phase == RoundPhase::RoundOver(RoundOutcome::Correct)
            && token.generation == self.generation
            && current == Some(token.question);
        if !fresh {
            debug!(phase = %self.phase, ?token, "stale advance ignored");
            return false;
        }
        self.generate_question().is_some()
    }

    /// The player has read the feedback for a wrong answer.
    ///
    /// With no lives left the round finishes; otherwise the next question
    /// is asked. Returns `false` if no feedback was pending.
    pub fn acknowledge_feedback(&mut self) -> bool {
        if !self.phase.awaits_acknowledge() {
            debug!(phase = %self.phase, "acknowledge ignored");
            return false;
        }
        let lives = self.state.as_ref().map_or(0, |s| s.lives);
        if lives == 0 {
            self.finish(EndReason::OutOfLives);
        } else {
            self.phase = RoundPhase::Active;
            self.generate_question();
        }
        true
    }

    /// End the running round now.
    ///
    /// Returns the summary, or `None` if no round was running (the summary
    /// of a round is only ever produced once).
    pub fn end(&mut self) -> Option<GameSummary> {
        if !self.phase.is_in_game() {
            debug!(phase = %self.phase, "end ignored");
            return None;
        }
        self.finish(EndReason::Ended)
    }

    /// Leave the game: stop the clock and discard the state, no summary.
    pub fn return_to_menu(&mut self) {
        self.clock.stop();
        self.generation += 1;
        self.phase = RoundPhase::Idle;
        self.state = None;
        self.answers = None;
        info!("returned to menu");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The current (or just finished) game, `None` while idle.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Options for the current question.
    pub fn answer_set(&self) -> Option<&AnswerSet> {
        self.answers.as_ref()
    }

    /// Summary of the most recently finished round.
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }

    pub fn last_difficulty(&self) -> Option<DifficultyId> {
        self.last_difficulty
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock access, for the event loop that waits on its ticks.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Progress bar fill, 0–100, towards the configured target of correct answers.
    pub fn progress_percent(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| {
            (s.correct_answers * 100 / self.config.progress_target).min(100)
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn finish(&mut self, reason: EndReason) -> Option<GameSummary> {
        self.clock.stop();
        self.phase = RoundPhase::Finished;
        self.answers = None;

        let state = self.state.as_mut()?;
        state.active = false;
        state.current_question = None;
        let summary = GameSummary::from_state(state, reason);
        self.last_summary = Some(summary.clone());

        info!(
            difficulty = %summary.difficulty,
            score = summary.score,
            correct = summary.correct_answers,
            total = summary.total_questions,
            accuracy = summary.accuracy_percent,
            ?reason,
            "game finished"
        );

        self.emit_state();
        self.emit(RoundEvent::GameFinished(summary.clone()));
        Some(summary)
    }

    fn emit_state(&mut self) {
        if let Some(state) = self.state.clone() {
            self.emit(RoundEvent::StateChanged(state));
        }
    }

    fn emit(&mut self, event: RoundEvent) {
        for presenter in &mut self.presenters {
            if let Err(e) = event.deliver(presenter.as_mut()) {
                debug!(presenter = presenter.name(), error = %e, "presenter failed, ignoring");
            }
        }
    }
}
