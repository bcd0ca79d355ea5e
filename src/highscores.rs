//! Persistent high-score table.
//!
//! The table is a short list kept in descending score order.  Equal scores
//! keep their insertion order, so an older entry outranks a newer tie.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub name: String,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HighScoreTable {
    entries: Vec<HighScore>,
    capacity: usize,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), capacity }
    }

    /// Build from stored entries, re-sorting and trimming as needed.
    pub fn from_entries(mut entries: Vec<HighScore>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Score of the last slot, or 0 while the table has room.
    pub fn lowest(&self) -> u32 {
        if self.entries.len() < self.capacity {
            0
        } else {
            self.entries.last().map(|e| e.score).unwrap_or(0)
        }
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    pub fn qualifies(&self, score: u32) -> bool {
        self.capacity > 0 && score > self.lowest()
    }

    /// Insert if the score qualifies.  Returns the zero-based rank.
    pub fn insert(&mut self, entry: HighScore) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        // First slot holding a strictly lower score; ties stay ahead.
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }
}

// ── Storage ───────────────────────────────────────────────────────────────────

/// Where the table lives between runs.  Each call reads or writes the
/// whole list.
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<HighScore>>;
    fn save(&mut self, entries: &[HighScore]) -> Result<()>;
}

/// JSON file on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.flying_spur_scores.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".flying_spur_scores.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Vec<HighScore>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let entries: Vec<HighScore> = serde_json::from_str(&text)?;
                debug!("loaded {} high scores from {}", entries.len(), self.path.display());
                Ok(entries)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the target.
    fn save(&mut self, entries: &[HighScore]) -> Result<()> {
        let text = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        info!("saved {} high scores to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// In-process store; nothing survives the run.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<HighScore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScore>) -> Self {
        Self { entries }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScore>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScore]) -> Result<()> {
        self.entries = entries.to_vec();
        Ok(())
    }
}
