//! High score leaderboard system
//!
//! Keeps the top 10 scores, sorted descending, persisted as a versioned JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::JsonFile;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Leaderboard file name inside the data directory
pub const HIGHSCORES_FILE: &str = "highscores.json";
const HIGHSCORES_VERSION: u32 = 1;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Ties rank below existing entries with the same score.
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Restore ordering and size after loading untrusted data
    pub fn normalize(&mut self) {
        // Stable sort keeps earlier entries first among ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Plain-text table for the high score screen
    pub fn render_table(&self) -> String {
        if self.entries.is_empty() {
            return "No scores recorded yet.\n".to_string();
        }
        let mut out = format!(" {:<4} {:<15} {}\n", "Rank", "Name", "Score");
        out.push_str("---------------------------------\n");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(" {:>2}.  {:<15} {}\n", i + 1, entry.name, entry.score));
        }
        out
    }
}

/// Leaderboard collaborator the game reports final scores to
pub trait ScoreStore {
    /// Record a finished game. Returns the rank achieved, if any.
    fn submit(&mut self, name: &str, score: u64) -> Option<usize>;
    /// Best `n` entries, highest first
    fn fetch_top(&self, n: usize) -> Vec<HighScoreEntry>;
    /// Called when the application quits
    fn flush(&mut self) {}
}

impl ScoreStore for HighScores {
    fn submit(&mut self, name: &str, score: u64) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.add_score(name, score)
    }

    fn fetch_top(&self, n: usize) -> Vec<HighScoreEntry> {
        self.entries.iter().take(n).cloned().collect()
    }
}

/// Leaderboard saved to disk after every accepted submission
#[derive(Debug)]
pub struct FileScoreStore {
    scores: HighScores,
    file: JsonFile,
}

impl FileScoreStore {
    /// Load high scores from `<data_dir>/highscores.json`
    pub fn load(data_dir: impl AsRef<Path>) -> Self {
        let file = JsonFile::new(data_dir.as_ref().join(HIGHSCORES_FILE), HIGHSCORES_VERSION);
        let mut scores: HighScores = file.load_or_recover();
        scores.normalize();
        log::info!("Loaded {} high scores", scores.entries.len());
        Self { scores, file }
    }

    /// Save high scores. Errors are logged; the in-memory table stays authoritative.
    pub fn save(&self) {
        match self.file.write(&self.scores) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.scores.entries.len()),
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for FileScoreStore {
    fn submit(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.scores.submit(name, score);
        if rank.is_some() {
            self.save();
        }
        rank
    }

    fn fetch_top(&self, n: usize) -> Vec<HighScoreEntry> {
        self.scores.fetch_top(n)
    }

    fn flush(&mut self) {
        self.save();
    }
}
