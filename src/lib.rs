//! # Litestore
//!
//! A minimal synchronous data-access layer over SQLite.
//!
//! ## Features
//!
//! - One owned connection per [`DataStore`], no pooling, no async
//! - Row-level CRUD built from ordered column/value rows
//! - Typed values bound as driver-level parameters
//! - Raw-SQL passthrough for migrations and ad hoc statements
//! - Idempotent schema evolution via [`DataStore::ensure_column`]
//! - Guarded destructive admin operations with pluggable confirmation
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use litestore::{Condition, DataStore, Row, Value};
//!
//! let store = DataStore::open(Path::new("/path/to/data.db"), true).unwrap();
//! store.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)");
//!
//! let row = Row::new().set("id", 1).set("name", "O'Brien");
//! store.insert_row("users", &row).unwrap();
//!
//! store
//!     .update_cell("users", "name", &Value::from("Miles"), &Condition::key("id", 1))
//!     .unwrap();
//!
//! for user in store.get_all("SELECT * FROM users").unwrap() {
//!     println!("{}", user.to_json());
//! }
//! ```

pub mod condition;
pub mod confirm;
pub mod error;
pub mod outcome;
pub mod row;
pub mod store;
pub mod value;

// Re-export main types
pub use condition::Condition;
pub use confirm::{AFFIRMATIVE_INPUT, ConfirmPrompt, StdinConfirm};
pub use error::{Result, Severity, StoreError};
pub use outcome::ExecOutcome;
pub use row::Row;
pub use store::DataStore;
pub use value::{ColumnType, Value};
