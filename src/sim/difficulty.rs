//! Difficulty ratchet
//!
//! Enemy projectile drops get more frequent as the score climbs. The interval
//! only ever shrinks, by a fixed factor each time the score has moved a full
//! band past the last threshold crossed.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_DROP_INTERVAL_MS, DROP_SCALING_FACTOR, SCORE_BAND};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRatchet {
    /// Current drop interval (ms)
    pub base_drop_interval: f64,
    /// Score at which the interval last tightened
    pub last_score_threshold: u64,
}

impl Default for DifficultyRatchet {
    fn default() -> Self {
        Self {
            base_drop_interval: BASE_DROP_INTERVAL_MS,
            last_score_threshold: 0,
        }
    }
}

impl DifficultyRatchet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval until a sprite's next drop, tightening first if the score
    /// has reached the next band
    pub fn next_interval(&mut self, score: u64) -> f64 {
        if score >= self.last_score_threshold + SCORE_BAND {
            self.base_drop_interval *= DROP_SCALING_FACTOR;
            self.last_score_threshold = score;
            log::debug!(
                "Difficulty up at score {}: drop interval {:.0}ms",
                score,
                self.base_drop_interval
            );
        }
        self.base_drop_interval
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
