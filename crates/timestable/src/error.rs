//! Unified error type for Timestable.

use timestable_engine::EngineError;
use timestable_stats::StatsError;

use crate::CommandError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TimestableError {
    /// Bad engine input (unknown difficulty name).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Loading or saving stats failed.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Player input could not be understood.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Reading input or writing the screen failed.
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),
}
