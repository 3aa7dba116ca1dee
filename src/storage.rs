//! Best-time persistence
//!
//! A tiny key-value store abstraction with two backends: an in-memory map for
//! tests/headless runs and a JSON file for native use. Each game persists a
//! single numeric best-time under a fixed string key; missing or corrupt data
//! falls back to defaults rather than failing the session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

/// Process-wide key-value persistence
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
}

/// Volatile store for tests and headless demo runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// JSON-file-backed store; the whole map is rewritten on every set
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    /// Open (or create) a store at `path`. Corrupt files are logged and
    /// treated as empty rather than refusing to start.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let values = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(err) => {
                    log::warn!("ignoring corrupt store at {}: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: path.to_owned(),
            values,
        })
    }

    fn flush(&self) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.flush()
    }
}

/// A single persisted best time under a fixed key
pub struct BestTime<'a> {
    store: &'a mut dyn KvStore,
    key: &'static str,
}

impl<'a> BestTime<'a> {
    pub fn new(store: &'a mut dyn KvStore, key: &'static str) -> Self {
        Self { store, key }
    }

    /// Stored best time in ms, if any
    pub fn load(&self) -> Option<u64> {
        self.store.get(self.key).and_then(|v| v.parse().ok())
    }

    /// Record `time_ms` if it beats the stored best; returns true on a new
    /// record
    pub fn submit(&mut self, time_ms: u64) -> Result<bool, SessionError> {
        let is_record = self.load().is_none_or(|best| time_ms < best);
        if is_record {
            self.store.set(self.key, &time_ms.to_string())?;
            log::info!("new best time {time_ms}ms under {}", self.key);
        }
        Ok(is_record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_time_record_flow() {
        let mut store = MemoryStore::new();
        let mut best = BestTime::new(&mut store, "winding_race_best");
        assert_eq!(best.load(), None);
        assert!(best.submit(30_000).unwrap());
        assert!(!best.submit(35_000).unwrap());
        assert!(best.submit(25_000).unwrap());
        assert_eq!(best.load(), Some(25_000));
    }

    #[test]
    fn test_garbage_value_reads_as_none() {
        let mut store = MemoryStore::new();
        store.set("winding_race_best", "not a number").unwrap();
        let best = BestTime::new(&mut store, "winding_race_best");
        assert_eq!(best.load(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join("microcade_store_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("times.json");
        let _ = std::fs::remove_file(&path);

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set("k", "123").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("123"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = std::env::temp_dir().join("microcade_store_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("corrupt.json");
        std::fs::write(&path, "{{{not json").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k"), None);
        let _ = std::fs::remove_file(&path);
    }
}
