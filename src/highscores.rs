//! High score leaderboard system
//!
//! Persisted through a [`Storage`] backend, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::persistence::{ScoreCollector, ScoreSubmission, Storage};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player display name
    pub name: String,
    /// Player's score
    pub score: u64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "parm_blaster_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Equal scores rank after existing ones, so they must strictly beat the last
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
        };

        // Insert after any equal scores so ties keep insertion order
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

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores; unreadable data starts a fresh board
    pub fn load(storage: &dyn Storage) -> Self {
        let loaded = storage
            .get_item(Self::STORAGE_KEY)
            .and_then(|json| match json {
                Some(json) => Ok(Some(serde_json::from_str::<HighScores>(&json)?)),
                None => Ok(None),
            });

        match loaded {
            Ok(Some(mut scores)) => {
                // Re-establish ordering in case the stored list was edited by hand
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), GameError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Records final scores: local leaderboard first, remote collector second.
///
/// Neither step can fail the caller; problems are logged and the local
/// board is kept regardless of what the collector does.
pub struct ScoreKeeper {
    storage: Box<dyn Storage>,
    collector: Box<dyn ScoreCollector>,
    board: HighScores,
}

impl ScoreKeeper {
    pub fn new(storage: Box<dyn Storage>, collector: Box<dyn ScoreCollector>) -> Self {
        let board = HighScores::load(storage.as_ref());
        Self {
            storage,
            collector,
            board,
        }
    }

    pub fn board(&self) -> &HighScores {
        &self.board
    }

    /// Persist and submit a final score, returning its leaderboard rank
    pub fn record(&mut self, name: &str, score: u64) -> Option<usize> {
        // Reload so scores written by another session are not clobbered
        self.board = HighScores::load(self.storage.as_ref());
        let rank = self.board.add_score(name, score);
        if let Err(e) = self.board.save(self.storage.as_mut()) {
            log::error!("Failed to save high scores: {}", e);
        }

        let submission = ScoreSubmission {
            player_name: name.to_string(),
            score,
        };
        if let Err(e) = self.collector.submit(&submission) {
            log::error!("Error submitting score: {}", e);
        }

        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    struct FailingCollector;

    impl ScoreCollector for FailingCollector {
        fn submit(&mut self, _: &ScoreSubmission) -> Result<(), GameError> {
            Err(GameError::Submission("connection refused".into()))
        }
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score("a", 5), Some(1));
        assert_eq!(hs.add_score("b", 9), Some(1));
        assert_eq!(hs.add_score("c", 5), Some(3));
        let names: Vec<_> = hs.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_capped_at_ten() {
        let mut hs = HighScores::new();
        for i in 0..12u64 {
            hs.add_score(&format!("p{i}"), i);
        }
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.top_score(), Some(11));
        assert_eq!(hs.entries.last().map(|e| e.score), Some(2));
        assert!(!hs.qualifies(2));
        assert_eq!(hs.potential_rank(3), Some(10));
        assert_eq!(hs.add_score("late", 1), None);
    }

    #[test]
    fn test_zero_score_recorded_on_short_board() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score("zero", 0), Some(1));
    }

    #[test]
    fn test_stored_format_is_plain_list() {
        let mut hs = HighScores::new();
        hs.add_score("Ada", 3);
        let json = serde_json::to_string(&hs).unwrap();
        assert_eq!(json, r#"[{"name":"Ada","score":3}]"#);
    }

    #[test]
    fn test_keeper_persists_even_when_submission_fails() {
        let storage = MemoryStorage::new();
        let mut keeper = ScoreKeeper::new(Box::new(storage), Box::new(FailingCollector));
        assert_eq!(keeper.record("Ada", 7), Some(1));
        assert_eq!(keeper.record("Bo", 9), Some(1));
        assert_eq!(keeper.board().entries.len(), 2);
        assert_eq!(keeper.board().top_score(), Some(9));
    }

    #[test]
    fn test_load_ignores_garbage() {
        let mut storage = MemoryStorage::new();
        storage.set_item(HighScores::STORAGE_KEY, "nope").unwrap();
        assert!(HighScores::load(&storage).is_empty());
    }
}
