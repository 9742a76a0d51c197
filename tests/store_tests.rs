//! Integration tests for litestore
//!
//! These tests exercise the full DataStore surface against real database
//! files in temporary directories.

use std::path::Path;
use std::sync::{Arc, Mutex};

use litestore::{ColumnType, Condition, ConfirmPrompt, DataStore, Row, StoreError, Value};
use tempfile::TempDir;

/// Scripted confirmer recording every prompt it receives
struct ScriptedConfirm {
    answer: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirm {
    fn new(answer: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                answer,
                prompts: Arc::clone(&prompts),
            },
            prompts,
        )
    }
}

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

/// Create a store on a real file with a users table
fn setup_store(dir: &Path, unattended: bool) -> DataStore {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let store = DataStore::open(&dir.join("test.db"), unattended).unwrap();
    let outcome = store.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)");
    assert!(outcome.is_applied());
    store
}

#[test]
fn test_end_to_end_quote_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = setup_store(temp_dir.path(), true);

    let row = Row::new().set("id", 1).set("name", "O'Brien");
    assert!(store.insert_row("users", &row).unwrap().is_applied());

    let rows = store
        .get_all("SELECT name FROM users WHERE id=1")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("O'Brien")));
    assert_eq!(rows[0].to_json().to_string(), r#"{"name":"O'Brien"}"#);
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    {
        let store = DataStore::open(&db_path, true).unwrap();
        store.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)");
        store
            .insert_row("users", &Row::new().set("id", 1).set("name", "alice"))
            .unwrap();
        store.close().unwrap();
    }

    let store = DataStore::open(&db_path, true).unwrap();
    let rows = store.get_all("SELECT * FROM users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("alice")));
}

#[test]
fn test_two_independent_stores() {
    // Each store owns its own connection; instances do not share state.
    let temp_dir = TempDir::new().unwrap();
    let store_a = setup_store(temp_dir.path(), true);

    let other_dir = TempDir::new().unwrap();
    let store_b = setup_store(other_dir.path(), true);

    store_a
        .insert_row("users", &Row::new().set("id", 1).set("name", "a"))
        .unwrap();
    assert!(store_b.get_all("SELECT * FROM users").unwrap().is_empty());
}

#[test]
fn test_insert_many_then_update_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let store = setup_store(temp_dir.path(), true);

    let rows: Vec<Row> = (1..=50)
        .map(|i| Row::new().set("id", i).set("name", format!("user-{i}")))
        .collect();
    assert!(store.insert_many("users", &rows).unwrap().is_applied());

    let outcome = store
        .update_cell(
            "users",
            "name",
            &Value::from("renamed"),
            &Condition::raw("id > 40"),
        )
        .unwrap();
    assert!(outcome.is_applied());

    let renamed = store
        .get_all("SELECT * FROM users WHERE name = 'renamed'")
        .unwrap();
    assert_eq!(renamed.len(), 10);
}

#[test]
fn test_typed_values_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = DataStore::open(&temp_dir.path().join("test.db"), true).unwrap();
    store.execute("CREATE TABLE mixed (id INTEGER PRIMARY KEY, score REAL, data BLOB, note TEXT)");

    let row = Row::new()
        .set("id", 1)
        .set("score", 2.5)
        .set("data", vec![0xDEu8, 0xAD])
        .set("note", Value::Null);
    assert!(store.insert_row("mixed", &row).unwrap().is_applied());

    let rows = store.get_all("SELECT * FROM mixed").unwrap();
    assert_eq!(rows[0].get("score"), Some(&Value::Real(2.5)));
    assert_eq!(rows[0].get("data"), Some(&Value::Blob(vec![0xDE, 0xAD])));
    assert_eq!(rows[0].get("note"), Some(&Value::Null));
}

#[test]
fn test_ensure_column_migration_flow() {
    let temp_dir = TempDir::new().unwrap();
    let store = setup_store(temp_dir.path(), true);
    store
        .insert_row("users", &Row::new().set("id", 1).set("name", "alice"))
        .unwrap();

    // First run of a migration script creates the column
    assert!(!store.ensure_column("users", "email", ColumnType::Text).unwrap());
    // Second run is a no-op
    assert!(store.ensure_column("users", "email", ColumnType::Text).unwrap());

    store
        .update_cell(
            "users",
            "email",
            &Value::from("alice@example.com"),
            &Condition::key("id", 1),
        )
        .unwrap();
    let rows = store.get_all("SELECT email FROM users WHERE id = 1").unwrap();
    assert_eq!(rows[0].get("email"), Some(&Value::from("alice@example.com")));
}

#[test]
fn test_update_without_condition_is_rejected_before_execution() {
    let temp_dir = TempDir::new().unwrap();
    let store = setup_store(temp_dir.path(), true);
    store
        .insert_row("users", &Row::new().set("id", 1).set("name", "alice"))
        .unwrap();

    let result = store.update_cell(
        "users",
        "name",
        &Value::from("x"),
        &Condition::Equality(Vec::new()),
    );
    assert!(matches!(result, Err(StoreError::InvalidArgument(_))));

    let rows = store.get_all("SELECT name FROM users").unwrap();
    assert_eq!(rows[0].get("name"), Some(&Value::from("alice")));
}

#[test]
fn test_delete_all_rows_unattended() {
    let temp_dir = TempDir::new().unwrap();
    let (confirmer, prompts) = ScriptedConfirm::new(false);
    let mut store = setup_store(temp_dir.path(), true).with_confirmer(confirmer);

    for i in 1..=3 {
        store
            .insert_row("users", &Row::new().set("id", i).set("name", "x"))
            .unwrap();
    }

    assert!(store.delete_all_rows("users").unwrap());
    assert!(store.get_all("SELECT * FROM users").unwrap().is_empty());
    // Unattended mode never consulted the confirmer
    assert!(prompts.lock().unwrap().is_empty());
}

#[test]
fn test_delete_all_rows_interactive_refusal() {
    let temp_dir = TempDir::new().unwrap();
    let (confirmer, prompts) = ScriptedConfirm::new(false);
    let mut store = setup_store(temp_dir.path(), false).with_confirmer(confirmer);

    for i in 1..=3 {
        store
            .insert_row("users", &Row::new().set("id", i).set("name", "x"))
            .unwrap();
    }

    assert!(!store.delete_all_rows("users").unwrap());
    assert_eq!(store.get_all("SELECT * FROM users").unwrap().len(), 3);
    assert_eq!(prompts.lock().unwrap().len(), 1);
}

#[test]
fn test_clear_all_tables_across_tables() {
    let temp_dir = TempDir::new().unwrap();
    let (confirmer, prompts) = ScriptedConfirm::new(true);
    let mut store = setup_store(temp_dir.path(), false).with_confirmer(confirmer);
    store.execute("CREATE TABLE sessions (token TEXT PRIMARY KEY)");

    store
        .insert_row("users", &Row::new().set("id", 1).set("name", "a"))
        .unwrap();
    store
        .insert_row("sessions", &Row::new().set("token", "t1"))
        .unwrap();

    let cleared = store.clear_all_tables().unwrap();
    assert_eq!(cleared, vec!["users".to_string(), "sessions".to_string()]);
    assert!(store.get_all("SELECT * FROM users").unwrap().is_empty());
    assert!(store.get_all("SELECT * FROM sessions").unwrap().is_empty());
    assert!(prompts.lock().unwrap()[0].contains("ALL tables"));
}

#[test]
fn test_execute_runs_multi_statement_migrations() {
    let temp_dir = TempDir::new().unwrap();
    let store = DataStore::open(&temp_dir.path().join("test.db"), true).unwrap();

    let outcome = store.execute(
        "CREATE TABLE a (id INTEGER PRIMARY KEY);
         CREATE TABLE b (id INTEGER PRIMARY KEY);
         INSERT INTO a (id) VALUES (1);",
    );
    assert!(outcome.is_applied());
    assert_eq!(store.get_all("SELECT * FROM a").unwrap().len(), 1);
    assert!(store.get_all("SELECT * FROM b").unwrap().is_empty());
}
