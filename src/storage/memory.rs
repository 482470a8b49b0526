use super::{Storable, StorageError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Non-persistent store; values live as long as the instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Storage(format!("Failed to lock memory store: {}", e)))
    }
}

impl Storable for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        store.set_item("b", "3").unwrap();

        assert_eq!(store.get_item("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.get_item("b").unwrap(), Some("3".to_string()));
    }
}
