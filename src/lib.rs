pub mod cli;
pub mod config;
pub mod models;
pub mod storage;

pub use models::{filter_items, ItemState, State, StateError, TodoItem};
pub use storage::{Storable, StorageError, TodoStorage};
