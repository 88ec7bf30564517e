//! Error types for the engine layer.
//!
//! The engine itself has no runtime failures: calls that arrive in the
//! wrong phase are ignored, not rejected. The only errors are raised at
//! the boundary where text from the player becomes engine input.

/// Errors that can occur when building engine input.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The difficulty name is not one of the three presets.
    #[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

/// A presentation capability failed (sound device missing, closed output).
///
/// Returned by [`Presenter`](crate::Presenter) callbacks. The engine logs
/// it and carries on; it never reaches the player.
#[derive(Debug, thiserror::Error)]
#[error("presenter {presenter} failed: {reason}")]
pub struct PresentError {
    /// Which presenter failed.
    pub presenter: &'static str,
    /// What went wrong.
    pub reason: String,
}

impl PresentError {
    /// Build an error for the named presenter.
    pub fn new(presenter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            presenter,
            reason: reason.into(),
        }
    }
}
