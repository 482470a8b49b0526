use chrono::{TimeZone, Utc};
use todo_storage::storage::{JsonFileStore, MemoryStore, SqliteStore, Storable, STORAGE_KEY};
use todo_storage::{ItemState, TodoItem, TodoStorage};

fn item(name: &str, state: ItemState, priority: &str) -> TodoItem {
    let deadline = Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap();
    let mut item = TodoItem::new(name, deadline, priority);
    item.state = state;
    item
}

/// Runs `check` against a fresh instance of every store type.
fn with_each_store(check: impl Fn(&dyn Storable)) {
    let temp_dir = tempfile::Builder::new()
        .prefix("todo_test")
        .tempdir()
        .expect("Failed to create temporary directory");

    let memory = MemoryStore::new();
    let json = JsonFileStore::new(temp_dir.path().join("store.json"));
    let sqlite = SqliteStore::new(temp_dir.path().join("store.db")).expect("Failed to open sqlite store");

    check(&memory);
    check(&json);
    check(&sqlite);
}

#[test]
fn test_empty_store_returns_empty_list() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        assert!(storage.fetch_all().unwrap().is_empty());
    });
}

#[test]
fn test_round_trip_reassigns_ids() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        let mut items = vec![
            item("write report", ItemState::Working, "high"),
            item("buy milk", ItemState::Done, "low"),
            item("call bob", ItemState::Working, "urgent"),
        ];
        items[0].id = 9;
        items[1].select = true;
        items[2].id = 9;
        storage.save(&items).unwrap();

        let fetched = storage.fetch_all().unwrap();
        assert_eq!(fetched.len(), items.len());
        for (index, (got, original)) in fetched.iter().zip(&items).enumerate() {
            assert_eq!(got.id, index);
            let mut expected = original.clone();
            expected.id = index;
            assert_eq!(got, &expected);
        }
    });
}

#[test]
fn test_last_write_wins() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        storage
            .save(&[item("a", ItemState::Working, "low"), item("b", ItemState::Working, "low")])
            .unwrap();
        storage.save(&[item("c", ItemState::Done, "high")]).unwrap();

        let fetched = storage.fetch_all().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].name, "c");
        assert_eq!(fetched[0].state, ItemState::Done);
    });
}

#[test]
fn test_next_id_tracks_stored_count() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        assert_eq!(storage.next_id().unwrap(), 1);

        let mut items = storage.fetch_all().unwrap();
        for name in ["a", "b", "c"] {
            items.push(item(name, ItemState::Working, "medium"));
            // Unsaved items do not count
            assert_eq!(storage.next_id().unwrap(), storage.fetch_all().unwrap().len() + 1);
            storage.save(&items).unwrap();
            assert_eq!(storage.next_id().unwrap(), items.len() + 1);
        }
    });
}

#[test]
fn test_single_item_scenario() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        assert!(storage.fetch_all().unwrap().is_empty());

        storage.save(&[item("a", ItemState::Working, "medium")]).unwrap();
        let fetched = storage.fetch_all().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, 0);
        assert_eq!(fetched[0].name, "a");
        assert_eq!(fetched[0].state, ItemState::Working);
    });
}

#[test]
fn test_ids_are_positional_after_delete() {
    with_each_store(|store| {
        let storage = TodoStorage::new(store);
        storage
            .save(&[item("first", ItemState::Working, "low"), item("second", ItemState::Working, "low")])
            .unwrap();

        let mut items = storage.fetch_all().unwrap();
        assert_eq!(items[1].id, 1);
        items.remove(0);
        storage.save(&items).unwrap();

        let fetched = storage.fetch_all().unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].name, "second");
        assert_eq!(fetched[0].id, 0);
    });
}

#[test]
fn test_malformed_value_is_an_error() {
    with_each_store(|store| {
        store.set_item(STORAGE_KEY, "not json").unwrap();
        let storage = TodoStorage::new(store);
        assert!(storage.fetch_all().is_err());
    });
}

#[test]
fn test_other_keys_are_untouched() {
    with_each_store(|store| {
        store.set_item("unrelated", "keep me").unwrap();
        TodoStorage::new(store)
            .save(&[item("a", ItemState::Working, "low")])
            .unwrap();
        assert_eq!(store.get_item("unrelated").unwrap(), Some("keep me".to_string()));
    });
}
