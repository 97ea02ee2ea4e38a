//! Plain key/value storage backing the note store.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::gate::LibraryLock;
use crate::error::{Error, Result};

/// Flat string-keyed byte storage.
pub trait KeyValue {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All keys, in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// One file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open (and create if needed) a storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Take the directory's upload lock.
    pub fn lock_uploads(&self) -> Result<LibraryLock> {
        LibraryLock::acquire(&self.root)
    }

    fn path_of(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(Error::Other(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(key))
    }
}

impl KeyValue for FileKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_of(key)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_of(key)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_of(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.ends_with(".tmp") && !name.starts_with('.') {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
