//! JSON file store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{GameStats, StatsError, StatsStore};

/// Fixed key the stats record is stored under. The file is `<key>.json`.
pub const STORAGE_KEY: &str = "timestable-stats";

/// Stores the record as a small JSON object in a directory.
///
/// Every save overwrites the whole file (write to a temporary file, then
/// rename over the old one).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store keeping its file in `dir`. The directory is created on
    /// first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Full path of the stats file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Result<GameStats, StatsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stats file yet");
                return Ok(GameStats::default());
            }
            Err(source) => {
                return Err(StatsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StatsError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, stats: &GameStats) -> Result<(), StatsError> {
        let io_err = |source| StatsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(stats).map_err(StatsError::Encode)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
