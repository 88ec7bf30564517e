//! Player input: one line of text becomes one [`Command`].
//!
//! Parsing knows nothing about the current screen. A bare `1`–`4` is a
//! [`Command::Slot`]; the session decides whether that picks an answer or,
//! on the menu, a difficulty.

use std::str::FromStr;

use timestable_engine::{ANSWER_OPTIONS, DifficultyId};

/// Errors from parsing a line of player input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    /// Not a recognised command.
    #[error("unrecognised input {0:?} (type h for help)")]
    Unknown(String),

    /// `a` without a usable number after it.
    #[error("expected a positive number after `a`, got {0:?}")]
    BadAnswer(String),
}

/// Everything a player can type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `1`–`4`: an answer slot, or a menu entry.
    Slot(usize),
    /// `a 56`: answer with a literal value.
    Answer(u32),
    /// `easy`, `medium`, `hard`.
    Difficulty(DifficultyId),
    /// Empty line or `c`: continue after feedback.
    Continue,
    /// `r`: show the explanation again.
    ShowAgain,
    /// `p`: play again at the same difficulty.
    PlayAgain,
    /// `e`: end the current game now.
    End,
    /// `m` or `q`: back to the menu, dropping the current game.
    Menu,
    /// `h` or `?`.
    Help,
    /// `x`, `exit`, `quit`.
    Exit,
    /// `y` or `yes`: confirm leaving a game.
    Yes,
    /// `n` or `no`: stay in the game.
    No,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();

        if let Some(rest) = input.strip_prefix('a').filter(|r| r.starts_with(char::is_whitespace)) {
            let rest = rest.trim();
            return match rest.parse::<u32>() {
                Ok(value) if value > 0 => Ok(Self::Answer(value)),
                _ => Err(CommandError::BadAnswer(rest.to_string())),
            };
        }

        match input.as_str() {
            "" | "c" | "continue" => Ok(Self::Continue),
            "r" | "again" => Ok(Self::ShowAgain),
            "p" | "play" => Ok(Self::PlayAgain),
            "e" | "end" => Ok(Self::End),
            "m" | "q" | "menu" => Ok(Self::Menu),
            "h" | "?" | "help" => Ok(Self::Help),
            "x" | "exit" | "quit" => Ok(Self::Exit),
            "y" | "yes" => Ok(Self::Yes),
            "n" | "no" => Ok(Self::No),
            other => {
                if let Ok(slot) = other.parse::<usize>() {
                    if (1..=ANSWER_OPTIONS).contains(&slot) {
                        return Ok(Self::Slot(slot));
                    }
                }
                other
                    .parse::<DifficultyId>()
                    .map(Self::Difficulty)
                    .map_err(|_| CommandError::Unknown(s.trim().to_string()))
            }
        }
    }
}

/// Help text listing every command.
pub const HELP: &str = "\
  1-4      pick an answer (or a difficulty on the menu)
  a <n>    answer with the number n
  c        continue after an explanation (or just press Enter)
  r        show the explanation again
  e        end the game now
  p        play again
  m, q     back to the menu (asks first during a game)
  x        exit (asks first during a game)
  y, n     answer a \"leave this game?\" question";
