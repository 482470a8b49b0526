use std::path::Path;
use thiserror::Error;

#[cfg(test)]
pub(crate) mod test_utils;

pub mod json;
mod memory;
pub mod sqlite;
mod todo_storage;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use todo_storage::{TodoStorage, STORAGE_KEY};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Json,
    Sqlite,
}

impl StoreType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(StoreType::Json),
            "sqlite" => Some(StoreType::Sqlite),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StoreType::Json => "json",
            StoreType::Sqlite => "sqlite",
        }
    }
}

/// A string key-value store that persists text values.
pub trait Storable: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: Storable + ?Sized> Storable for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<T: Storable + ?Sized> Storable for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

pub fn create_store(store_type: StoreType, path: &Path) -> Result<Box<dyn Storable>, StorageError> {
    match store_type {
        StoreType::Json => {
            let store = JsonFileStore::new(path);
            Ok(Box::new(store))
        }
        StoreType::Sqlite => {
            let store = SqliteStore::new(path)?;
            Ok(Box::new(store))
        }
    }
}
