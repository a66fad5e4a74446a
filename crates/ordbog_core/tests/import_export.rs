use ordbog_core::db::open_db_in_memory;
use ordbog_core::{SqliteEntryRepository, StoreError, StoreNamespace, WordStore};
use serde_json::json;

#[test]
fn export_then_import_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Dictionary).unwrap();
    store.add("hus", "house").unwrap();
    store.add("bil", "car").unwrap();
    store.add("ø", "island").unwrap();

    let before = store.export_all();
    let written = store.import_all(&store.export_value()).unwrap();

    assert_eq!(written, 3);
    assert_eq!(store.export_all(), before);
}

#[test]
fn export_json_is_pretty_and_order_preserving() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Phonetic).unwrap();
    store.add("zebra", "seebra").unwrap();
    store.add("abe", "aabe").unwrap();

    let text = store.export_json().unwrap();
    assert_eq!(text, "{\n  \"zebra\": \"seebra\",\n  \"abe\": \"aabe\"\n}");
}

#[test]
fn import_merges_and_overwrites_on_conflict() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Dictionary).unwrap();
    store.add("hus", "house").unwrap();
    store.add("bil", "car").unwrap();

    let written = store
        .import_all(&json!({"bil": "automobile", "båd": "boat"}))
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(store.all_keys(), vec!["hus", "bil", "båd"]);
    assert_eq!(store.lookup("bil"), Some("automobile"));
}

#[test]
fn import_skips_non_string_values_and_does_not_count_them() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Dictionary).unwrap();

    let written = store
        .import_all(&json!({
            "en": "one",
            "to": 2,
            "tre": null,
            "fire": ["four"],
            "fem": {"nested": "five"},
            "seks": "six"
        }))
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(store.all_keys(), vec!["en", "seks"]);
}

#[test]
fn import_of_string_literal_is_malformed_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Dictionary).unwrap();
    store.add("hus", "house").unwrap();

    let err = store.import_all(&json!("not an object")).unwrap_err();
    assert!(matches!(err, StoreError::MalformedImport(_)));

    let err = store.import_json("\"not an object\"").unwrap_err();
    assert!(matches!(err, StoreError::MalformedImport(_)));

    assert_eq!(store.export_all().len(), 1);
    assert_eq!(store.lookup("hus"), Some("house"));
}

#[test]
fn import_of_invalid_json_text_is_malformed() {
    let conn = open_db_in_memory().unwrap();
    let mut store =
        WordStore::open(SqliteEntryRepository::new(&conn), StoreNamespace::Dictionary).unwrap();

    let err = store.import_json("{\"hus\": ").unwrap_err();
    assert!(matches!(err, StoreError::MalformedImport(message) if message.contains("invalid JSON")));
    assert!(store.is_empty());
}

#[test]
fn import_persists_through_reopen() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);
    {
        let mut store = WordStore::open(repo, StoreNamespace::Phonetic).unwrap();
        store
            .import_json(r#"{"hej": "hai", "farvel": "farvél"}"#)
            .unwrap();
    }

    let store = WordStore::open(repo, StoreNamespace::Phonetic).unwrap();
    assert_eq!(store.lookup("farvel"), Some("farvél"));
    assert_eq!(store.len(), 2);
}
