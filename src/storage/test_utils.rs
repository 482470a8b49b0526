use crate::models::TodoItem;
use crate::storage::{JsonFileStore, Storable, StorageError};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

/// A `Working`, unselected item with a fixed deadline and `medium` priority.
pub fn sample_item(name: &str) -> TodoItem {
    let deadline = Utc
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixed deadline");
    TodoItem::new(name, deadline, "medium")
}

/// Store whose every access fails, for checking error propagation.
pub struct FailingStore;

impl Storable for FailingStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Storage("store unavailable".to_string()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Storage("store unavailable".to_string()))
    }
}

/// Creates a JSON file store inside a fresh temporary directory.
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn create_test_store() -> (JsonFileStore, TempDir) {
    let temp_dir = tempfile::Builder::new()
        .prefix("todo_test")
        .tempdir()
        .expect("Failed to create temporary directory");
    let store = JsonFileStore::new(temp_dir.path().join("test-store.json"));
    (store, temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TodoStorage;

    #[test]
    fn test_store_initialization() {
        let (store, _temp_dir) = create_test_store();
        let storage = TodoStorage::new(store);
        assert!(storage.fetch_all().expect("Failed to load storage").is_empty());
    }

    #[test]
    fn test_items_persist_to_disk() {
        let (store, temp_dir) = create_test_store();
        TodoStorage::new(store)
            .save(&[sample_item("Test Task")])
            .expect("Failed to save items");

        let reopened = TodoStorage::new(JsonFileStore::new(temp_dir.path().join("test-store.json")));
        let items = reopened.fetch_all().expect("Failed to load storage");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Test Task");
    }
}
