//! Best-score persistence
//!
//! A single integer, stored as plain text so existing `highscore.txt` files
//! stay readable. Reads and writes are best-effort: failures are logged and
//! absorbed, and a missing or malformed file reads as 0.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::persistence::{self, StoreError};

/// Default file name inside the data directory
pub const HIGH_SCORE_FILE: &str = "highscore.txt";

pub trait HighScoreStore {
    fn read_high_score(&self) -> u64;
    fn write_high_score(&self, score: u64);
}

/// File-backed store
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
}

impl FileHighScores {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/highscore.txt`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HIGH_SCORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_read(&self) -> Result<u64, StoreError> {
        let text = persistence::read_text(&self.path)?;
        Ok(text.trim().parse()?)
    }
}

impl HighScoreStore for FileHighScores {
    fn read_high_score(&self) -> u64 {
        match self.try_read() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn write_high_score(&self, score: u64) {
        match persistence::write_atomic(&self.path, &score.to_string()) {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

/// In-memory store for tests and runs without a data directory
#[derive(Debug, Default)]
pub struct MemoryHighScores {
    best: Cell<u64>,
}

impl MemoryHighScores {
    pub fn new(best: u64) -> Self {
        Self {
            best: Cell::new(best),
        }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn read_high_score(&self) -> u64 {
        self.best.get()
    }

    fn write_high_score(&self, score: u64) {
        self.best.set(score);
    }
}
