//! String-keyed client state that survives between sessions.

use directories::ProjectDirs;
use fs_err as fs;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed state file: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    /// Simulates a host where storage access throws.
    pub unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }
}

/// All entries live in one JSON object; every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStorage {
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let proj_dirs =
            ProjectDirs::from("org", "troia", "faqdial").ok_or(StorageError::DataDirNotFound)?;
        Ok(proj_dirs.data_local_dir().join("state.json"))
    }

    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::open(Self::default_path()?))
    }

    /// A missing or unreadable file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring state file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.values.clear();
        self.flush()
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let changed = self
            .values
            .insert(key.to_string(), value.to_string())
            .is_none_or(|old| old != value);
        if changed { self.flush() } else { Ok(()) }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip_and_unavailable() {
        let mut s = MemoryStorage::new();
        s.set("a", "1").unwrap();
        assert_eq!(s.get("a").unwrap().as_deref(), Some("1"));
        s.remove("a").unwrap();
        assert_eq!(s.get("a").unwrap(), None);

        let mut broken = MemoryStorage::unavailable();
        assert!(matches!(broken.get("a"), Err(StorageError::Unavailable)));
        assert!(broken.set("a", "1").is_err());
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut s = JsonFileStorage::open(&path);
        s.set("faq.selected", "3").unwrap();
        drop(s);

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(reopened.get("faq.selected").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let s = JsonFileStorage::open(&path);
        assert!(s.entries().is_empty());
    }

    #[test]
    fn test_clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut s = JsonFileStorage::open(&path);
        s.set("k", "v").unwrap();
        s.clear().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim(), "{}");
    }
}
