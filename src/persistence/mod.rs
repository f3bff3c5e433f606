//! High-score persistence
//!
//! The core only needs a tiny key-value contract: integer get/set plus an
//! explicit flush. [`JsonFileStore`] backs it with a JSON file on disk;
//! [`MemoryStore`] backs tests and one-off demo runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Persistence failures. Reads never surface these (missing or unreadable
/// values fall back to defaults); writes are best-effort and logged.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("store io error: {0}")]
    Io(#[from] io::Error),
    #[error("store encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Integer key-value store with an explicit flush
pub trait KvStore {
    /// Read a stored integer, or `default` if the key is absent
    fn get_int(&self, key: &str, default: i32) -> i32;

    /// Stage an integer for the next flush
    fn set_int(&mut self, key: &str, value: i32);

    /// Write staged values to the backing medium
    fn flush(&mut self) -> Result<(), PersistError>;
}

/// In-memory store for tests and throwaway runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
    flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `flush` has been called
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }
}

impl KvStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        self.flushes += 1;
        Ok(())
    }
}

/// File-backed store holding a flat JSON object of integers
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, i32>,
}

impl JsonFileStore {
    /// Open a store at `path`. A missing or unreadable file starts empty so
    /// reads fall back to their defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read_values(&path) {
            Ok(values) => {
                log::info!("loaded {} stored value(s) from {:?}", values.len(), path);
                values
            }
            Err(err) => {
                if path.exists() {
                    log::warn!("could not read store {:?}: {err}", path);
                }
                HashMap::new()
            }
        };
        Self { path, values }
    }

    fn read_values(path: &Path) -> Result<HashMap<String, i32>, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl KvStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), PersistError> {
        let json = serde_json::to_string(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
