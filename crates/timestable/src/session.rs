//! `QuizSession`: one player at one terminal.
//!
//! The session owns the engine, the stats store and the deferred advance
//! after a correct answer. [`QuizSession::run`] is the event loop; the
//! synchronous methods underneath it ([`handle_line`](QuizSession::handle_line),
//! [`tick`](QuizSession::tick), [`fire_advance`](QuizSession::fire_advance))
//! are what each wake-up calls, one at a time.

use std::io::Write;

use timestable_engine::{
    AdvanceToken, AnswerOutcome, DifficultyId, Feedback, RoundEngine, RoundOutcome, RoundPhase,
};
use timestable_stats::{GameStats, StatsStore};
use timestable_tick::{Clock, IntervalClock};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::command::HELP;
use crate::render::{LOOK_AGAIN, explanation};
use crate::{Command, TimestableError};

const GAME_OVER_PROMPT: &str = "  [p] play again   [m] menu   [x] exit";
const LEAVE_PROMPT: &str = "  Leave this game? Your current progress will be lost. [y/n]";

/// Which screen the player is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// Where the player asked to go from a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leave {
    Menu,
    Exit,
}

/// Whether the event loop keeps going after a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Drives a [`RoundEngine`] from terminal input.
pub struct QuizSession<C: Clock, S: StatsStore, W: Write> {
    engine: RoundEngine<C>,
    store: S,
    out: W,
    screen: Screen,
    stats: GameStats,
    /// Token and due time of the next question after a correct answer.
    pending_advance: Option<(AdvanceToken, Instant)>,
    /// Explanation for the wrong answer waiting to be acknowledged.
    last_feedback: Option<Feedback>,
    /// The finished round's summary already went to the store.
    recorded: bool,
    /// Leaving a running game waits for a yes.
    pending_leave: Option<Leave>,
}

impl<C: Clock, S: StatsStore, W: Write> QuizSession<C, S, W> {
    /// Wrap an idle engine. Stats that fail to load are logged and start
    /// from zero.
    pub fn new(engine: RoundEngine<C>, store: S, out: W) -> Self {
        let stats = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not load stats, starting fresh");
            GameStats::default()
        });
        Self {
            engine,
            store,
            out,
            screen: Screen::Menu,
            stats,
            pending_advance: None,
            last_feedback: None,
            recorded: false,
            pending_leave: None,
        }
    }

    // -----------------------------------------------------------------------
    // Wake-ups
    // -----------------------------------------------------------------------

    /// Handle one line of player input.
    ///
    /// Input that does not parse is returned as
    /// [`TimestableError::Command`]; the session state is unchanged, except
    /// that an open leave prompt is cancelled.
    ///
    /// Leaving a running game (menu or exit) only happens after the player
    /// answers `y` to the confirmation; any other line keeps playing.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, TimestableError> {
        let parsed = line.parse::<Command>();
        if let Some(leave) = self.pending_leave.take() {
            return self.confirm_leave(leave, parsed.ok());
        }
        let command = parsed?;
        debug!(?command, screen = ?self.screen, "command");

        if command == Command::Exit {
            if self.screen == Screen::Playing {
                return self.ask_leave(Leave::Exit);
            }
            return self.exit();
        }
        if command == Command::Help {
            writeln!(self.out, "{HELP}")?;
            return Ok(Flow::Continue);
        }

        match self.screen {
            Screen::Menu => self.on_menu(command)?,
            Screen::Playing => self.on_playing(command)?,
            Screen::GameOver => self.on_game_over(command)?,
        }
        self.after_engine_call()?;
        Ok(Flow::Continue)
    }

    /// One clock tick.
    pub fn tick(&mut self) -> Result<(), TimestableError> {
        self.engine.tick();
        self.after_engine_call()
    }

    /// Run the deferred advance now, whatever its due time.
    ///
    /// A stale token is ignored by the engine.
    pub fn fire_advance(&mut self) -> Result<(), TimestableError> {
        if let Some((token, _)) = self.pending_advance.take() {
            self.engine.advance(token);
        }
        self.after_engine_call()
    }

    /// Start a round at `difficulty`, from whatever screen.
    pub fn start(&mut self, difficulty: DifficultyId) {
        self.pending_advance = None;
        self.last_feedback = None;
        self.recorded = false;
        self.screen = Screen::Playing;
        self.engine.start(difficulty);
    }

    /// Print the main menu.
    pub fn show_menu(&mut self) -> Result<(), TimestableError> {
        writeln!(
            self.out,
            "\n  ✖️  Times Table Quiz\n  Best score: {}   Games played: {}\n",
            self.stats.best_score, self.stats.games_played
        )?;
        for (i, id) in DifficultyId::ALL.iter().enumerate() {
            let config = id.config();
            writeln!(
                self.out,
                "  [{}] {:<7} tables {}-{}, {} points each",
                i + 1,
                id.as_str(),
                config.table_range.start(),
                config.table_range.end(),
                config.points_per_correct
            )?;
        }
        writeln!(self.out, "  [x] exit     h for help")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn engine(&self) -> &RoundEngine<C> {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Due time of the deferred advance, if one is pending.
    pub fn advance_due(&self) -> Option<Instant> {
        self.pending_advance.map(|(_, at)| at)
    }

    pub fn into_parts(self) -> (RoundEngine<C>, S, W) {
        (self.engine, self.store, self.out)
    }

    // -----------------------------------------------------------------------
    // Screens
    // -----------------------------------------------------------------------

    fn on_menu(&mut self, command: Command) -> Result<(), TimestableError> {
        match command {
            Command::Difficulty(id) => self.start(id),
            Command::Slot(n) => match menu_pick(n) {
                Some(id) => self.start(id),
                None => writeln!(self.out, "  Pick a difficulty: 1, 2 or 3.")?,
            },
            Command::Menu => self.show_menu()?,
            _ => writeln!(self.out, "  Pick a difficulty: 1, 2 or 3.")?,
        }
        Ok(())
    }

    fn on_playing(&mut self, command: Command) -> Result<(), TimestableError> {
        match command {
            Command::Slot(slot) => {
                let outcome = self.engine.submit_slot(slot);
                self.on_answer(outcome)?;
            }
            Command::Answer(value) => {
                let outcome = self.engine.submit_answer(value);
                self.on_answer(outcome)?;
            }
            Command::Continue => {
                if self.engine.acknowledge_feedback() {
                    self.last_feedback = None;
                }
            }
            Command::ShowAgain => match self.last_feedback {
                Some(feedback) => writeln!(self.out, "{}", explanation(&feedback, LOOK_AGAIN))?,
                None => writeln!(self.out, "  Nothing to show again.")?,
            },
            Command::End => {
                self.pending_advance = None;
                self.engine.end();
            }
            Command::PlayAgain => {
                if let Some(id) = self.engine.last_difficulty() {
                    self.start(id);
                }
            }
            Command::Menu => {
                self.ask_leave(Leave::Menu)?;
            }
            Command::Difficulty(_) => {
                writeln!(self.out, "  Finish this game first, or press m for the menu.")?
            }
            Command::Help | Command::Exit | Command::Yes | Command::No => {}
        }
        Ok(())
    }

    fn on_game_over(&mut self, command: Command) -> Result<(), TimestableError> {
        match command {
            Command::PlayAgain | Command::Continue => {
                if let Some(id) = self.engine.last_difficulty() {
                    self.start(id);
                }
            }
            Command::Difficulty(id) => self.start(id),
            Command::Slot(n) => match menu_pick(n) {
                Some(id) => self.start(id),
                None => writeln!(self.out, "{GAME_OVER_PROMPT}")?,
            },
            Command::Menu => self.to_menu()?,
            _ => writeln!(self.out, "{GAME_OVER_PROMPT}")?,
        }
        Ok(())
    }

    fn on_answer(&mut self, outcome: AnswerOutcome) -> Result<(), TimestableError> {
        match outcome {
            AnswerOutcome::Correct { token, .. } => {
                let due = Instant::now() + self.engine.config().advance_delay;
                self.pending_advance = Some((token, due));
            }
            AnswerOutcome::Incorrect { feedback, .. } => {
                self.last_feedback = Some(feedback);
            }
            AnswerOutcome::Ignored => match self.engine.phase() {
                RoundPhase::RoundOver(RoundOutcome::Incorrect) => {
                    writeln!(self.out, "  Press Enter to continue.")?
                }
                RoundPhase::RoundOver(RoundOutcome::Correct) => {}
                _ => writeln!(self.out, "  Pick 1-4.")?,
            },
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ask_leave(&mut self, leave: Leave) -> Result<Flow, TimestableError> {
        self.pending_leave = Some(leave);
        writeln!(self.out, "{LEAVE_PROMPT}")?;
        Ok(Flow::Continue)
    }

    fn confirm_leave(&mut self, leave: Leave, answer: Option<Command>) -> Result<Flow, TimestableError> {
        if answer != Some(Command::Yes) {
            debug!(?leave, "leave cancelled");
            writeln!(self.out, "  Carrying on!")?;
            return Ok(Flow::Continue);
        }
        match leave {
            Leave::Menu => {
                self.to_menu()?;
                Ok(Flow::Continue)
            }
            Leave::Exit => self.exit(),
        }
    }

    fn exit(&mut self) -> Result<Flow, TimestableError> {
        if self.engine.phase().is_in_game() {
            self.engine.return_to_menu();
        }
        self.pending_advance = None;
        writeln!(self.out, "  Bye! 👋")?;
        Ok(Flow::Exit)
    }

    fn to_menu(&mut self) -> Result<(), TimestableError> {
        self.engine.return_to_menu();
        self.pending_advance = None;
        self.last_feedback = None;
        self.screen = Screen::Menu;
        self.show_menu()
    }

    /// Record a newly finished round exactly once and switch to game over.
    fn after_engine_call(&mut self) -> Result<(), TimestableError> {
        if !self.engine.phase().is_finished() || self.recorded {
            return Ok(());
        }
        self.recorded = true;
        self.screen = Screen::GameOver;
        self.pending_advance = None;
        self.last_feedback = None;
        self.pending_leave = None;

        let Some(score) = self.engine.last_summary().map(|s| s.score) else {
            return Ok(());
        };
        let new_best = self.stats.is_new_best(score);
        match self.store.record_game(score) {
            Ok(stats) => {
                info!(score, best_score = stats.best_score, games_played = stats.games_played, "stats saved");
                self.stats = stats;
            }
            Err(e) => {
                warn!(error = %e, score, "could not save stats");
                self.stats = self.stats.with_game(score);
            }
        }

        if new_best {
            writeln!(self.out, "\n  🏆 New best score!")?;
        }
        writeln!(
            self.out,
            "  Best score: {}   Games played: {}\n\n{GAME_OVER_PROMPT}",
            self.stats.best_score, self.stats.games_played
        )?;
        Ok(())
    }
}

impl<S: StatsStore, W: Write> QuizSession<IntervalClock, S, W> {
    /// The event loop: player input, clock ticks and the deferred advance.
    ///
    /// Returns when the player exits or the input closes. Each wake-up is
    /// handled to completion before the next one is polled.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), TimestableError> {
        let mut lines = input.lines();
        if self.screen == Screen::Menu {
            self.show_menu()?;
        }

        loop {
            let advance_due = self.advance_due();
            let flow = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => match self.handle_line(&line) {
                        Err(TimestableError::Command(e)) => {
                            writeln!(self.out, "  {e}")?;
                            Flow::Continue
                        }
                        other => other?,
                    },
                    None => {
                        debug!("input closed");
                        Flow::Exit
                    }
                },
                _ = self.engine.clock_mut().wait_for_tick() => {
                    self.tick()?;
                    Flow::Continue
                }
                () = sleep_until(advance_due) => {
                    self.fire_advance()?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        if self.engine.phase().is_in_game() {
            self.engine.return_to_menu();
        }
        Ok(())
    }
}

/// Menu entries are numbered from 1 in preset order.
fn menu_pick(n: usize) -> Option<DifficultyId> {
    n.checked_sub(1).and_then(|i| DifficultyId::ALL.get(i).copied())
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timestable_engine::EngineConfig;
    use timestable_stats::MemoryStore;
    use timestable_tick::ManualClock;

    // =========================================================================
    // Helpers
    // =========================================================================

    type TestSession = QuizSession<ManualClock, MemoryStore, Vec<u8>>;

    fn session() -> TestSession {
        let engine = RoundEngine::with_seed(EngineConfig::default(), ManualClock::new(), 11);
        QuizSession::new(engine, MemoryStore::new(), Vec::new())
    }

    fn correct_slot(session: &TestSession) -> usize {
        let engine = session.engine();
        let answer = engine.state().unwrap().current_question.unwrap().correct_answer;
        engine.answer_set().unwrap().slot_of(answer).unwrap()
    }

    fn wrong_slot(session: &TestSession) -> usize {
        let correct = correct_slot(session);
        if correct == 1 { 2 } else { 1 }
    }

    fn output(session: TestSession) -> String {
        let (_, _, out) = session.into_parts();
        String::from_utf8(out).unwrap()
    }

    // =========================================================================
    // Menu
    // =========================================================================

    #[test]
    fn test_menu_slot_starts_difficulty() {
        let mut s = session();
        assert_eq!(s.handle_line("2").unwrap(), Flow::Continue);
        assert_eq!(s.screen(), Screen::Playing);
        assert_eq!(s.engine().state().unwrap().difficulty, DifficultyId::Medium);
        assert!(s.engine().clock().is_running());
    }

    #[test]
    fn test_menu_rejects_slot_four() {
        let mut s = session();
        s.handle_line("4").unwrap();
        assert_eq!(s.screen(), Screen::Menu);
        assert!(output(s).contains("Pick a difficulty"));
    }

    #[test]
    fn test_bad_input_is_command_error() {
        let mut s = session();
        let err = s.handle_line("banana").unwrap_err();
        assert!(matches!(err, TimestableError::Command(_)));
        assert_eq!(s.screen(), Screen::Menu);
    }

    #[test]
    fn test_show_menu_lists_presets() {
        let mut s = session();
        s.show_menu().unwrap();
        let out = output(s);
        assert!(out.contains("[1] easy"));
        assert!(out.contains("tables 1-8, 15 points"));
        assert!(out.contains("Games played: 0"));
    }

    // =========================================================================
    // Playing
    // =========================================================================

    #[test]
    fn test_correct_answer_schedules_advance() {
        let mut s = session();
        s.handle_line("easy").unwrap();
        let slot = correct_slot(&s);
        s.handle_line(&slot.to_string()).unwrap();

        assert!(s.advance_due().is_some());
        assert_eq!(s.engine().state().unwrap().score, 10);

        s.fire_advance().unwrap();
        assert!(s.advance_due().is_none());
        assert_eq!(s.engine().state().unwrap().total_questions, 2);
    }

    #[test]
    fn test_wrong_answer_waits_for_continue() {
        let mut s = session();
        s.handle_line("easy").unwrap();
        let slot = wrong_slot(&s);
        s.handle_line(&slot.to_string()).unwrap();
        assert_eq!(s.engine().state().unwrap().lives, 2);

        // Answers are ignored until the explanation is acknowledged.
        s.handle_line("1").unwrap();
        assert_eq!(s.engine().state().unwrap().lives, 2);

        s.handle_line("r").unwrap();
        s.handle_line("").unwrap();
        assert_eq!(s.engine().state().unwrap().total_questions, 2);

        let out = output(s);
        assert!(out.contains("Press Enter to continue."));
        assert!(out.contains(LOOK_AGAIN));
    }

    #[test]
    fn test_out_of_lives_records_once() {
        let mut s = session();
        s.handle_line("1").unwrap();
        for _ in 0..3 {
            let slot = wrong_slot(&s);
            s.handle_line(&slot.to_string()).unwrap();
            s.handle_line("c").unwrap();
        }
        assert_eq!(s.screen(), Screen::GameOver);
        assert_eq!(s.stats().games_played, 1);
        assert_eq!(s.store().load().unwrap().games_played, 1);

        // Further wake-ups do not record again.
        s.tick().unwrap();
        s.handle_line("r").unwrap();
        assert_eq!(s.store().load().unwrap().games_played, 1);
    }

    #[test]
    fn test_timeout_finishes_and_records() {
        let mut s = session();
        s.handle_line("3").unwrap();
        let slot = correct_slot(&s);
        s.handle_line(&slot.to_string()).unwrap();
        s.fire_advance().unwrap();

        for _ in 0..60 {
            s.tick().unwrap();
        }
        assert_eq!(s.screen(), Screen::GameOver);
        assert!(!s.engine().clock().is_running());
        assert_eq!(s.stats(), GameStats { best_score: 20, games_played: 1 });
        assert!(output(s).contains("New best score!"));
    }

    #[test]
    fn test_end_clears_pending_advance() {
        let mut s = session();
        s.handle_line("1").unwrap();
        let slot = correct_slot(&s);
        s.handle_line(&slot.to_string()).unwrap();
        s.handle_line("e").unwrap();

        assert!(s.advance_due().is_none());
        assert_eq!(s.screen(), Screen::GameOver);
        s.fire_advance().unwrap();
        assert_eq!(s.engine().last_summary().unwrap().total_questions, 1);
    }

    #[test]
    fn test_menu_mid_game_discards_round_after_yes() {
        let mut s = session();
        s.handle_line("1").unwrap();
        s.handle_line("m").unwrap();
        assert_eq!(s.screen(), Screen::Playing);
        assert!(s.engine().clock().is_running());

        s.handle_line("y").unwrap();
        assert_eq!(s.screen(), Screen::Menu);
        assert!(s.engine().state().is_none());
        assert!(!s.engine().clock().is_running());
        assert_eq!(s.stats().games_played, 0);
    }

    // =========================================================================
    // Game over
    // =========================================================================

    #[test]
    fn test_play_again_uses_last_difficulty() {
        let mut s = session();
        s.handle_line("hard").unwrap();
        s.handle_line("e").unwrap();
        s.handle_line("p").unwrap();
        assert_eq!(s.screen(), Screen::Playing);
        assert_eq!(s.engine().state().unwrap().difficulty, DifficultyId::Hard);
        assert_eq!(s.engine().clock().overlapping_starts(), 0);
    }

    #[test]
    fn test_menu_mid_game_cancelled_keeps_playing() {
        let mut s = session();
        s.handle_line("1").unwrap();
        s.handle_line("m").unwrap();
        s.handle_line("n").unwrap();

        assert_eq!(s.screen(), Screen::Playing);
        assert!(s.engine().state().is_some());
        assert!(s.engine().clock().is_running());

        // The prompt is gone: a later yes does nothing.
        s.handle_line("y").unwrap();
        assert_eq!(s.screen(), Screen::Playing);

        let out = output(s);
        assert!(out.contains("Leave this game?"));
        assert!(out.contains("Carrying on!"));
    }

    #[test]
    fn test_any_other_line_cancels_leaving() {
        let mut s = session();
        s.handle_line("1").unwrap();
        s.handle_line("m").unwrap();
        let slot = correct_slot(&s);
        s.handle_line(&slot.to_string()).unwrap();

        assert_eq!(s.screen(), Screen::Playing);
        // The slot only cancelled the prompt, it did not answer.
        assert_eq!(s.engine().state().unwrap().score, 0);
    }

    #[test]
    fn test_unparseable_line_cancels_leaving() {
        let mut s = session();
        s.handle_line("1").unwrap();
        s.handle_line("m").unwrap();
        assert_eq!(s.handle_line("zzz").unwrap(), Flow::Continue);

        s.handle_line("y").unwrap();
        assert_eq!(s.screen(), Screen::Playing);
    }

    #[test]
    fn test_game_ending_clears_leave_prompt() {
        let mut s = session();
        s.handle_line("1").unwrap();
        s.handle_line("m").unwrap();
        for _ in 0..60 {
            s.tick().unwrap();
        }
        assert_eq!(s.screen(), Screen::GameOver);

        s.handle_line("y").unwrap();
        assert_eq!(s.screen(), Screen::GameOver);
    }

    #[test]
    fn test_exit_mid_game_asks_then_stops_clock() {
        let mut s = session();
        s.handle_line("1").unwrap();
        assert_eq!(s.handle_line("x").unwrap(), Flow::Continue);
        assert!(s.engine().clock().is_running());

        assert_eq!(s.handle_line("no").unwrap(), Flow::Continue);
        assert_eq!(s.handle_line("x").unwrap(), Flow::Continue);
        assert_eq!(s.handle_line("yes").unwrap(), Flow::Exit);
        assert!(!s.engine().clock().is_running());
    }

    #[test]
    fn test_exit_from_menu_is_immediate() {
        let mut s = session();
        assert_eq!(s.handle_line("x").unwrap(), Flow::Exit);
    }
}
