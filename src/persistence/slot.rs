//! Durable key-value backends.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::StorageError;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A place saved games live, keyed by slot name.
pub trait StorageSlot {
    /// Bytes stored under `key`, or `None` when empty.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Overwrite `key`.
    fn set(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()>;

    /// Clear `key`. Clearing an empty key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// In-memory backend for tests and hosts without a disk.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: FxHashMap<String, Vec<u8>>,
    offline: bool,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every operation fails, like a locked-down browser.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            entries: FxHashMap::default(),
            offline: true,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.offline {
            return Err(StorageError::Unavailable("storage is offline".to_string()));
        }
        Ok(())
    }
}

impl StorageSlot for MemorySlot {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.check()?;
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Store files under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.save"))
    }
}

impl StorageSlot for FileSlot {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let io = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io)?;
        fs::write(self.path(key), bytes).map_err(io)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.get("a").unwrap(), None);
        slot.set("a", b"one").unwrap();
        assert_eq!(slot.get("a").unwrap().as_deref(), Some(&b"one"[..]));
        slot.remove("a").unwrap();
        slot.remove("a").unwrap();
        assert_eq!(slot.get("a").unwrap(), None);
    }

    #[test]
    fn test_unavailable_slot_errors() {
        let mut slot = MemorySlot::unavailable();
        assert!(matches!(slot.get("a"), Err(StorageError::Unavailable(_))));
        assert!(slot.set("a", b"x").is_err());
    }

    #[test]
    fn test_file_slot() {
        let dir = std::env::temp_dir().join(format!("quiz-party-slot-{}", std::process::id()));
        let mut slot = FileSlot::new(&dir);
        assert_eq!(slot.get("match-game").unwrap(), None);
        slot.set("match-game", b"{}").unwrap();
        assert_eq!(slot.get("match-game").unwrap(), Some(b"{}".to_vec()));
        slot.remove("match-game").unwrap();
        assert_eq!(slot.get("match-game").unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
