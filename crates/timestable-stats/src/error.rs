//! Error types for the stats layer.

use std::path::PathBuf;

/// Errors that can occur while loading or saving stats.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Reading or writing the stats file failed.
    #[error("stats file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stats file exists but is not a valid stats record.
    #[error("stats file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The stats record could not be serialized.
    #[error("failed to encode stats: {0}")]
    Encode(#[source] serde_json::Error),
}
