//! Persistence for settings and scores
//!
//! - `Storage`: LocalStorage-style string key/value backend (file or memory)
//! - `collector`: hand-off of final scores to a remote collector

pub mod collector;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use collector::{DisabledCollector, JsonLinesOutbox, ScoreCollector, ScoreSubmission};

use crate::GameError;

/// String key/value store
pub trait Storage {
    /// Read a key; `Ok(None)` when it was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError>;
}

/// In-memory storage (tests, or hosts without a disk)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GameError::storage(key, e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        fs::create_dir_all(&self.dir).map_err(|e| GameError::storage(key, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| GameError::storage(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| GameError::storage(key, e))?;
        log::debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}
