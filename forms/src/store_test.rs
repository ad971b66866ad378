use super::*;
use crate::error::ErrorCode;
use crate::schema::{FieldSchema, FieldType};

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("forms-store-{}", uuid::Uuid::new_v4()))
}

fn sample(title: &str) -> FormConfig {
    let mut config = FormConfig::new(title);
    config.fields.push(FieldSchema::new("f1", FieldType::Email, "Email", "email"));
    config
}

// =============================================================
// MemoryFormStore
// =============================================================

#[test]
fn memory_save_then_load() {
    let mut store = MemoryFormStore::new();
    let config = sample("Signup");
    store.save(&config).unwrap();
    assert_eq!(store.load(&config.id).unwrap(), config);
    assert_eq!(store.len(), 1);
}

#[test]
fn memory_save_overwrites() {
    let mut store = MemoryFormStore::new();
    let mut config = sample("Signup");
    store.save(&config).unwrap();
    config.title = "Renamed".into();
    store.save(&config).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.load(&config.id).unwrap().title, "Renamed");
}

#[test]
fn memory_missing_id_is_not_found() {
    let store = MemoryFormStore::new();
    let err = store.load("nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "nope"));
    assert_eq!(err.error_code(), "E_FORM_NOT_FOUND");
}

#[test]
fn memory_list_is_sorted_by_id() {
    let mut store = MemoryFormStore::new();
    let a = sample("A");
    let b = sample("B");
    store.save(&a).unwrap();
    store.save(&b).unwrap();
    let ids: Vec<String> = store.list().unwrap().into_iter().map(|c| c.id).collect();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(ids, expected);
}

// =============================================================
// JsonFileStore
// =============================================================

#[test]
fn file_store_round_trips_through_disk() {
    let dir = scratch_dir();
    let mut store = JsonFileStore::open(&dir).unwrap();
    let config = sample("Contact");
    store.save(&config).unwrap();

    let reopened = JsonFileStore::open(&dir).unwrap();
    assert_eq!(reopened.load(&config.id).unwrap(), config);
    assert_eq!(reopened.list().unwrap().len(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_store_writes_pretty_camel_case_json() {
    let dir = scratch_dir();
    let mut store = JsonFileStore::open(&dir).unwrap();
    let config = sample("Contact");
    store.save(&config).unwrap();

    let text = fs::read_to_string(dir.join(format!("{}.json", config.id))).unwrap();
    assert!(text.contains('\n'));
    assert!(text.contains("\"createdAt\""));
    assert!(text.contains("\"type\": \"email\""));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_store_missing_form_is_not_found() {
    let dir = scratch_dir();
    let store = JsonFileStore::open(&dir).unwrap();
    assert!(matches!(store.load("absent"), Err(StoreError::NotFound(_))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_store_ignores_non_json_files() {
    let dir = scratch_dir();
    let mut store = JsonFileStore::open(&dir).unwrap();
    store.save(&sample("One")).unwrap();
    fs::write(dir.join("notes.txt"), "not a form").unwrap();
    assert_eq!(store.list().unwrap().len(), 1);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn file_store_corrupt_file_is_serde_error() {
    let dir = scratch_dir();
    let store = JsonFileStore::open(&dir).unwrap();
    fs::write(dir.join("broken.json"), "{ not json").unwrap();
    let err = store.load("broken").unwrap_err();
    assert_eq!(err.error_code(), "E_STORE_SERDE");
    fs::remove_dir_all(&dir).unwrap();
}
