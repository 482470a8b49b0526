use super::{Storable, StorageError};
use crate::config::{ConfigError, ConfigManager};
use crate::models::TodoItem;
use std::path::Path;
use tracing::debug;

/// Key under which the whole item list is stored.
pub const STORAGE_KEY: &str = "todo-items";

/// Reads and writes the full todo list as one JSON array in a key-value store.
///
/// Item ids are positional: every [`fetch_all`](Self::fetch_all) rewrites
/// `id` to the item's index in the stored list, so ids shift when earlier
/// items are removed.
pub struct TodoStorage<S = Box<dyn Storable>> {
    store: S,
}

impl TodoStorage<Box<dyn Storable>> {
    /// Builds an adapter over the store selected by the user's configuration
    /// in `~/.config/todo-storage/config.json`.
    pub fn with_default_store() -> Result<Self, ConfigError> {
        Self::from_config(None)
    }

    /// Builds an adapter over the store selected by the config file at
    /// `config_path`, or the user's default config file when `None`.
    pub fn from_config(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let manager = ConfigManager::new(config_path)?;
        Ok(Self::new(manager.create_store()?))
    }
}

impl<S: Storable> TodoStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Count of stored items plus one.
    ///
    /// Not unique across deletions: removing an item and adding another can
    /// hand out a number that was already used.
    pub fn next_id(&self) -> Result<usize, StorageError> {
        Ok(self.fetch_all()?.len() + 1)
    }

    pub fn fetch_all(&self) -> Result<Vec<TodoItem>, StorageError> {
        let raw = self
            .store
            .get_item(STORAGE_KEY)?
            .filter(|value| !value.is_empty());

        let mut items: Vec<TodoItem> = match raw {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        for (index, item) in items.iter_mut().enumerate() {
            item.id = index;
        }

        debug!(key = STORAGE_KEY, count = items.len(), "fetched todo items");
        Ok(items)
    }

    pub fn save(&self, items: &[TodoItem]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.store.set_item(STORAGE_KEY, &json)?;
        debug!(key = STORAGE_KEY, count = items.len(), "saved todo items");
        Ok(())
    }
}
