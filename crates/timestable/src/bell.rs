//! Audible cue on every answer.

use std::io::Write;

use timestable_engine::{PresentError, Presenter};

const BELL: &[u8] = b"\x07";
const DOUBLE_BELL: &[u8] = b"\x07\x07";

/// Rings the terminal bell after each answer: once when right, twice when
/// wrong.
///
/// A terminal without a bell just ignores the bytes. Write failures come
/// back as [`PresentError`] and the engine carries on without sound.
pub struct BellCue<W: Write> {
    out: W,
}

impl<W: Write> BellCue<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for BellCue<W> {
    fn name(&self) -> &'static str {
        "bell"
    }

    fn on_answer_result(&mut self, correct: bool, _correct_answer: u32) -> Result<(), PresentError> {
        let cue = if correct { BELL } else { DOUBLE_BELL };
        self.out
            .write_all(cue)
            .and_then(|()| self.out.flush())
            .map_err(|e| PresentError::new("bell", e.to_string()))
    }
}
