use super::{Storable, StorageError};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

type Entries = BTreeMap<String, String>;

/// Keeps every key in a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = shellexpand::tilde(&path.as_ref().to_string_lossy()).to_string();
        Self {
            path: PathBuf::from(path),
        }
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Replaces the file atomically: entries go to a temporary file in the
    /// same directory which is then renamed over the store.
    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(entries)?;
        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        // Verify the write was successful by reading back
        if self.read_entries()? != *entries {
            return Err(StorageError::Storage(
                "Data integrity check failed".to_string(),
            ));
        }

        Ok(())
    }
}

impl Storable for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        debug!(path = %self.path.display(), key, "writing json store");
        self.write_entries(&entries)
    }
}
