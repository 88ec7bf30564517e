//! Text rendering and the terminal presenter.
//!
//! The free functions build the strings; [`TerminalPresenter`] decides when
//! to print them in response to engine events.

use std::io::Write;

use timestable_engine::{
    AnswerSet, EndReason, Feedback, GameState, GameSummary, PresentError, Presenter, Question,
};

/// Largest dot grid drawn in either direction.
pub const MAX_GRID_SIDE: u32 = 10;

const PROGRESS_WIDTH: u32 = 20;

/// Encouragement under a fresh explanation.
pub const ENCOURAGEMENT: &str = "You got this! 🌟";

/// Encouragement when the player asks to see it again.
pub const LOOK_AGAIN: &str = "Look at the rows and dots 👀";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn hearts(lives: u32) -> String {
    "❤️".repeat(lives as usize)
}

pub fn status_line(state: &GameState) -> String {
    format!(
        "Score: {}   Lives: {}   Time: {}s",
        state.score,
        hearts(state.lives),
        state.time_left_secs
    )
}

/// `[■■■■□□…] 25%`, one block per 5%.
pub fn progress_bar(percent: u32) -> String {
    let percent = percent.min(100);
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {percent}%",
        "■".repeat(filled as usize),
        "□".repeat((PROGRESS_WIDTH - filled) as usize)
    )
}

pub fn question_block(question: &Question, answers: &AnswerSet) -> String {
    let options: String = answers
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| format!(" [{}] {option}", i + 1))
        .collect();
    format!(
        "\n  {} × {} = ?\n {options}",
        question.factor_a, question.factor_b
    )
}

/// `factor_b` rows of `factor_a` dots, capped at [`MAX_GRID_SIDE`] each way,
/// followed by a caption. The caption notes the visible size when capped.
pub fn dot_grid(factor_a: u32, factor_b: u32, correct_answer: u32) -> String {
    let cols = factor_a.min(MAX_GRID_SIDE);
    let rows = factor_b.min(MAX_GRID_SIDE);

    let row = vec!["●"; cols as usize].join(" ");
    let mut out: String = (0..rows).map(|_| format!("    {row}\n")).collect();

    out.push_str(&format!("    {factor_b} rows of {factor_a} dots = {correct_answer}"));
    if factor_a > MAX_GRID_SIDE || factor_b > MAX_GRID_SIDE {
        out.push_str(&format!(" (showing {rows}×{cols})"));
    }
    out
}

/// The educational explanation after a wrong answer.
pub fn explanation(feedback: &Feedback, encouragement: &str) -> String {
    let Feedback {
        factor_a,
        factor_b,
        correct_answer,
    } = *feedback;
    format!(
        "\n  💡 Let's Learn Together!\n\n  {factor_a} × {factor_b} = {correct_answer}\n\n  \
         Make {factor_b} rows of {factor_a} dots.\n{}\n\n  {encouragement}\n  \
         [c] Continue 🚀   [r] Show Again 📖",
        dot_grid(factor_a, factor_b, correct_answer)
    )
}

/// The game-over screen.
pub fn game_over(summary: &GameSummary) -> String {
    let reason = match summary.reason {
        EndReason::TimeUp => "Time's up!",
        EndReason::OutOfLives => "Out of lives!",
        EndReason::Ended => "Game ended.",
    };
    let mut out = format!(
        "\n  {reason}\n  {}\n\n  Final score:     {}\n  Correct answers: {}\n  Accuracy:        {}%",
        summary.tier().headline(),
        summary.score,
        summary.correct_answers,
        summary.accuracy_percent
    );
    if summary.celebrate() {
        out.push_str("\n\n  🎊 🎉 🎊 Amazing! 🎊 🎉 🎊");
    }
    out
}

// ---------------------------------------------------------------------------
// TerminalPresenter
// ---------------------------------------------------------------------------

/// Prints the game to a terminal (or any writer).
///
/// The countdown is not reprinted every second: the status line appears
/// when score or lives change, on every tenth second, and for each of the
/// last five.
pub struct TerminalPresenter<W: Write> {
    out: W,
    progress_target: u32,
    last: Option<GameState>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, progress_target: u32) -> Self {
        Self {
            out,
            progress_target: progress_target.max(1),
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, text: &str) -> Result<(), PresentError> {
        writeln!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|e| PresentError::new("terminal", e.to_string()))
    }

    fn wants_status(&self, state: &GameState) -> bool {
        let Some(last) = &self.last else {
            return true;
        };
        if last.score != state.score || last.lives != state.lives {
            return true;
        }
        let ticked = last.time_left_secs != state.time_left_secs;
        let t = state.time_left_secs;
        state.active && ticked && t > 0 && (t % 10 == 0 || t <= 5)
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn on_state_changed(&mut self, state: &GameState) -> Result<(), PresentError> {
        let print = state.active && self.wants_status(state);
        self.last = Some(state.clone());
        if print {
            self.print(&format!("  {}", status_line(state)))?;
        }
        Ok(())
    }

    fn on_question_ready(&mut self, question: &Question, answers: &AnswerSet) -> Result<(), PresentError> {
        let correct = self.last.as_ref().map_or(0, |s| s.correct_answers);
        let percent = (correct * 100 / self.progress_target).min(100);
        let text = format!("  {}{}", progress_bar(percent), question_block(question, answers));
        self.print(&text)
    }

    fn on_answer_result(&mut self, correct: bool, correct_answer: u32) -> Result<(), PresentError> {
        if correct {
            self.print("\n  🎉 Correct! 🎉")
        } else {
            self.print(&format!("\n  ✗ Not quite. The answer is {correct_answer}."))
        }
    }

    fn on_feedback_needed(&mut self, feedback: &Feedback) -> Result<(), PresentError> {
        self.print(&explanation(feedback, ENCOURAGEMENT))
    }

    fn on_game_finished(&mut self, summary: &GameSummary) -> Result<(), PresentError> {
        self.print(&game_over(summary))
    }
}
