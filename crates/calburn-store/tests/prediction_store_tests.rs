// Integration tests for the SQLite prediction store

use calburn_core::model::{ActivityInput, NewPrediction};
use calburn_core::logging_facility::test_capture::init_test_capture;
use calburn_core::schema::{EVENT_END, FIELD_COMPONENT, FIELD_RECORD_ID};
use calburn_core::{ExErrorKind, PredictionLog};
use calburn_store::schema::{table_exists, PREDICTIONS_TABLE};
use calburn_store::SqlitePredictionStore;
use proptest::prelude::*;
use rusqlite::Connection;
use tempfile::TempDir;

fn setup_store() -> (TempDir, SqlitePredictionStore) {
    let dir = TempDir::new().unwrap();
    let store = SqlitePredictionStore::new(dir.path().join("database.db"));
    store.initialize().unwrap();
    (dir, store)
}

fn prediction(gender: &str, age: u32, duration: f64, calories: f64) -> NewPrediction {
    NewPrediction::new(
        ActivityInput {
            gender: gender.to_string(),
            age,
            height: 175.0,
            weight: 70.0,
            duration,
            heart_rate: 110.0,
            body_temp: 40.5,
        },
        calories,
    )
}

fn row_count(store: &SqlitePredictionStore) -> i64 {
    let conn = Connection::open(store.path()).unwrap();
    conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_initialize_creates_table() {
    let (_dir, store) = setup_store();
    let conn = Connection::open(store.path()).unwrap();
    assert!(table_exists(&conn, PREDICTIONS_TABLE).unwrap());
}

#[test]
fn test_initialize_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let store = SqlitePredictionStore::new(dir.path().join("nested").join("database.db"));
    store.initialize().unwrap();
    assert!(store.path().exists());
}

#[test]
fn test_initialize_twice_keeps_data() {
    // Given: a store with one record
    let (_dir, store) = setup_store();
    store.insert(&prediction("Male", 25, 30.0, 199.98)).unwrap();

    // When: initialize runs again
    store.initialize().unwrap();

    // Then: one table, and the record survives
    let conn = Connection::open(store.path()).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'predictions'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_round_trip_preserves_fields() {
    let (_dir, store) = setup_store();
    let new = NewPrediction::new(
        ActivityInput {
            gender: "fEmAlE".to_string(),
            age: 68,
            height: 154.3,
            weight: 61.07,
            duration: 17.5,
            heart_rate: 93.25,
            body_temp: 39.85,
        },
        87.35,
    );

    let id = store.insert_returning_id(&new).unwrap();
    let rows = store.list_all().unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id, id);
    assert_eq!(row.gender, "fEmAlE");
    assert_eq!(row.age, 68);
    assert_eq!(row.height, 154.3);
    assert_eq!(row.weight, 61.07);
    assert_eq!(row.duration, 17.5);
    assert_eq!(row.heart_rate, 93.25);
    assert_eq!(row.body_temp, 39.85);
    assert_eq!(row.prediction, 87.35);
}

#[test]
fn test_insert_appends_exactly_one_row() {
    let (_dir, store) = setup_store();
    assert_eq!(row_count(&store), 0);
    store.insert(&prediction("Male", 30, 10.0, 50.0)).unwrap();
    assert_eq!(row_count(&store), 1);
    store.insert(&prediction("Male", 30, 10.0, 50.0)).unwrap();
    assert_eq!(row_count(&store), 2);
}

#[test]
fn test_list_all_empty_store() {
    let (_dir, store) = setup_store();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_adopts_existing_database() {
    // A database created by an earlier deployment with the same DDL
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                gender TEXT, age INTEGER, height REAL, weight REAL,
                duration REAL, heart_rate REAL, body_temp REAL, prediction REAL
            );
            INSERT INTO predictions (gender, age, height, weight, duration, heart_rate, body_temp, prediction)
            VALUES ('Female', 20, 166, 60, 14, 94, 40.3, 66.0);",
        )
        .unwrap();
    }

    let store = SqlitePredictionStore::new(&path);
    store.initialize().unwrap();
    store.insert(&prediction("Male", 25, 30.0, 199.98)).unwrap();

    let rows = store.list_all().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].gender, "Male");
    assert_eq!(rows[1].gender, "Female");
    assert_eq!(rows[1].height, 166.0);
}

#[test]
fn test_unopenable_path_is_storage_error() {
    // A directory cannot be opened as a database file
    let dir = TempDir::new().unwrap();
    let store = SqlitePredictionStore::new(dir.path());

    let err = store.list_all().unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);

    let err = store.insert(&prediction("Male", 1, 1.0, 1.0)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);
}

#[test]
fn test_list_all_before_initialize_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let store = SqlitePredictionStore::new(dir.path().join("fresh.db"));
    let err = store.list_all().unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Storage);
    assert!(err.message().contains("no such table"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_list_all_strictly_descending(durations in proptest::collection::vec(0.0f64..300.0, 0..20)) {
        let (_dir, store) = setup_store();
        for d in &durations {
            store.insert(&prediction("Female", 33, *d, d * 3.0)).unwrap();
        }

        let rows = store.list_all().unwrap();
        prop_assert_eq!(rows.len(), durations.len());
        prop_assert!(rows.windows(2).all(|w| w[0].id > w[1].id));

        // newest first: reversed insertion order
        let read_back: Vec<f64> = rows.iter().map(|r| r.duration).collect();
        let expected: Vec<f64> = durations.iter().rev().copied().collect();
        prop_assert_eq!(read_back, expected);
    }
}

#[test]
fn test_insert_logs_assigned_record_id() {
    let capture = init_test_capture();
    let (_dir, store) = setup_store();

    let id = store
        .insert_returning_id(&prediction("Female", 52, 17.0, 81.25))
        .unwrap();

    let ends = capture.find("store_insert", EVENT_END);
    let id_text = id.to_string();
    let matching: Vec<_> = ends
        .iter()
        .filter(|e| e.field(FIELD_RECORD_ID) == Some(id_text.as_str()))
        .collect();
    assert!(!matching.is_empty(), "insert end event should carry record_id");
    assert_eq!(
        matching[0].field(FIELD_COMPONENT),
        Some("calburn_store::repo::sqlite_repo")
    );
}
