//! Remote score collection
//!
//! The session hands each final score to a [`ScoreCollector`]. A failed
//! submission is logged by the caller and never touches game state.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Payload sent to the score collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
}

pub trait ScoreCollector {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), GameError>;
}

/// Collector that accepts and discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCollector;

impl ScoreCollector for DisabledCollector {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), GameError> {
        log::debug!(
            "Score submission disabled, dropping {}: {}",
            submission.player_name,
            submission.score
        );
        Ok(())
    }
}

/// Appends one JSON document per line to a writer, for a separate uploader
/// process to forward
#[derive(Debug)]
pub struct JsonLinesOutbox<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesOutbox<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreCollector for JsonLinesOutbox<W> {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), GameError> {
        let line = serde_json::to_string(submission)?;
        writeln!(self.writer, "{line}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| GameError::Submission(e.to_string()))?;
        log::info!(
            "Score submitted: {} -> {}",
            submission.player_name,
            submission.score
        );
        Ok(())
    }
}
