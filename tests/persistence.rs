use serde_json::json;
use todo_list::fields::{Filter, TaskUpdate};
use todo_list::list::TaskList;
use todo_list::persist::{load_initial, StoreWriter, STORAGE_KEY};
use todo_list::session::Session;
use todo_list::store::{FileStore, KeyValueStore};
use todo_list::validate::{validate_task_list, Validated};

fn open_session(store: &FileStore) -> Session {
    let tasks = load_initial(store, STORAGE_KEY);
    let writer = StoreWriter::spawn(Box::new(store.clone()), STORAGE_KEY).unwrap();
    Session::with_writer(tasks, writer)
}

#[test]
fn changes_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut session = open_session(&store);
    let milk = session.submit_text("buy milk").unwrap();
    let dog = session.submit_text("walk dog").unwrap();
    assert!(session.set_field(milk, TaskUpdate::SetChecked(true)));
    session.set_filter(Filter::Checked);
    let expected = session.tasks().clone();
    drop(session);

    let session = open_session(&store);
    assert_eq!(*session.tasks(), expected);
    assert_eq!(session.tasks().as_slice()[0].id, dog);
    // Filter selection is not persisted.
    assert_eq!(session.filter(), Filter::All);
}

#[test]
fn lifecycle_ends_with_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut session = open_session(&store);
    let id = session.submit_text("buy milk").unwrap();
    session.set_field(id, TaskUpdate::SetChecked(true));
    session.set_field(id, TaskUpdate::SetRemoved(true));
    session.set_filter(Filter::Removed);
    assert_eq!(session.visible().len(), 1);
    assert_eq!(session.empty_trash(), 1);
    drop(session);

    assert_eq!(store.get(STORAGE_KEY).unwrap(), Some(json!([])));
    assert!(load_initial(&store, STORAGE_KEY).is_empty());
}

#[test]
fn stored_collection_validates_back_to_the_same_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let list = TaskList::default()
        .submit("one", 1)
        .submit("two", 2)
        .update(1, &TaskUpdate::SetRemoved(true));
    let writer = StoreWriter::spawn(Box::new(store.clone()), STORAGE_KEY).unwrap();
    writer.enqueue(&list);
    writer.shutdown();

    let raw = store.get(STORAGE_KEY).unwrap().unwrap();
    assert_eq!(validate_task_list(&raw), Validated::Valid(list));
}

#[test]
fn malformed_store_starts_empty_and_is_replaced_on_first_change() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store
        .set(STORAGE_KEY, &json!([{"id": 1, "value": "a", "checked": "yes", "removed": false}]))
        .unwrap();

    let mut session = open_session(&store);
    assert!(session.tasks().is_empty());
    session.submit_text("fresh");
    drop(session);

    let reloaded = load_initial(&store, STORAGE_KEY);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.as_slice()[0].value, "fresh");
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), "[{").unwrap();
    let store = FileStore::new(dir.path());
    assert!(load_initial(&store, STORAGE_KEY).is_empty());
}
