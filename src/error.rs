//! Error types for the game core.
//!
//! Nothing here is fatal to a running session: the session logs storage,
//! submission and asset failures and keeps going. Only invalid caller input
//! (an empty name, an action in the wrong phase) is handed back.

use std::fmt;
use std::io;

use crate::sim::SessionPhase;

#[derive(Debug)]
pub enum GameError {
    /// Start was requested with a blank player name
    EmptyPlayerName,
    /// The requested action is not valid in the current phase
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },
    /// Reading or writing a storage key failed
    Storage { key: String, source: io::Error },
    /// Stored or outgoing JSON could not be (de)serialized
    Serialization(serde_json::Error),
    /// The remote score collector rejected or failed the submission
    Submission(String),
    /// A font or image could not be preloaded
    AssetLoad(String),
    /// Settings values out of range
    InvalidSettings(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPlayerName => write!(f, "player name must not be empty"),
            Self::InvalidTransition { phase, action } => {
                write!(f, "cannot {action} while {}", phase.as_str())
            }
            Self::Storage { key, source } => write!(f, "storage error for '{key}': {source}"),
            Self::Serialization(e) => write!(f, "serialization error: {e}"),
            Self::Submission(msg) => write!(f, "score submission failed: {msg}"),
            Self::AssetLoad(msg) => write!(f, "asset load failed: {msg}"),
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl GameError {
    /// Wrap an I/O error with the storage key it happened on
    pub fn storage(key: impl Into<String>, source: io::Error) -> Self {
        Self::Storage {
            key: key.into(),
            source,
        }
    }
}
