use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Durable key-value target holding the whole serialized collection under a
/// single key.
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
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

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        write_atomic(&path, bytes).map_err(|source| StorageError::Write { path, source })
    }
}

pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "storage path must have a parent directory",
        )
    })?;
    fs::create_dir_all(parent)?;

    let tmp_path = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// In-process storage; `fail_writes` simulates a full or read-only disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.to_string(), bytes.into());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Rejected(key.to_string()));
        }
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_read_missing_key_returns_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.read("travelMapCities").expect("read"), None);
    }

    #[test]
    fn file_storage_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage
            .write("travelMapCities", b"{\"schema_version\":1}")
            .expect("write");

        assert_eq!(
            storage.read("travelMapCities").expect("read").as_deref(),
            Some(&b"{\"schema_version\":1}"[..])
        );
        assert!(dir.path().join("nested/travelMapCities.json").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FileStorage::new(dir.path());

        for key in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                storage.write(key, b"[]"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn file_storage_write_reports_path_on_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("fixture write");
        let mut storage = FileStorage::new(&blocker);

        let err = storage
            .write("travelMapCities", b"[]")
            .expect_err("parent is a file, write should fail");

        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn memory_storage_can_fail_writes() {
        let mut storage = MemoryStorage::new();
        storage.write("k", b"1").expect("write");
        storage.set_fail_writes(true);

        assert!(matches!(
            storage.write("k", b"2"),
            Err(StorageError::Rejected(_))
        ));
        assert_eq!(storage.get("k"), Some(&b"1"[..]));
    }
}
