//! The DataStore: one connection, row-level CRUD and admin operations

use std::path::{Path, PathBuf};
use std::process;

use rusqlite::{Connection, params_from_iter};
use tracing::{debug, error, info, warn};

use crate::condition::Condition;
use crate::confirm::{ConfirmPrompt, StdinConfirm};
use crate::error::{Result, Severity, StoreError, classify};
use crate::outcome::ExecOutcome;
use crate::row::Row;
use crate::value::{ColumnType, Value};

/// A synchronous data-access layer over one SQLite database file.
///
/// Each instance exclusively owns a single connection for its entire
/// lifetime; the connection is released exactly once when the store is
/// dropped or [`close`](DataStore::close)d. Every operation executes its
/// statement and commits before returning (autocommit per statement);
/// there is no multi-statement transaction API and no internal
/// concurrency. Callers needing parallelism use one store per worker or
/// serialize access externally.
pub struct DataStore {
    /// Path to the database file (":memory:" for in-memory stores)
    path: PathBuf,
    /// The single owned connection
    conn: Connection,
    /// Suppresses confirmation prompts for destructive operations
    unattended: bool,
    /// Asked before destructive operations in attended mode
    confirmer: Box<dyn ConfirmPrompt>,
}

impl DataStore {
    /// Open (or create) a database file at the specified path.
    ///
    /// `unattended` suppresses the interactive confirmation otherwise
    /// required by [`clear_all_tables`](DataStore::clear_all_tables) and
    /// [`delete_all_rows`](DataStore::delete_all_rows).
    pub fn open(path: &Path, unattended: bool) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
            unattended,
            confirmer: Box::new(StdinConfirm),
        })
    }

    /// Open an in-memory database, mainly for tests
    pub fn open_in_memory(unattended: bool) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            unattended,
            confirmer: Box::new(StdinConfirm),
        })
    }

    /// Replace the confirmation policy.
    ///
    /// The default asks on stderr and reads stdin; tests and embedding
    /// applications can install any [`ConfirmPrompt`] instead.
    pub fn with_confirmer(mut self, confirmer: impl ConfirmPrompt + 'static) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the store suppresses confirmation prompts
    pub fn is_unattended(&self) -> bool {
        self.unattended
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the store, releasing the connection.
    ///
    /// Dropping the store has the same effect; this form surfaces any
    /// failure to flush pending state.
    pub fn close(self) -> Result<()> {
        let DataStore { conn, .. } = self;
        conn.close()
            .map_err(|(_, err)| StoreError::Database(err.to_string()))
    }

    /// Insert one row, if not already present.
    ///
    /// Columns come from the row in order; values are bound as typed
    /// parameters and the statement commits immediately. A uniqueness or
    /// primary-key conflict is swallowed and reported as
    /// [`ExecOutcome::IgnoredConflict`]. Other execution errors are
    /// logged and reported as [`ExecOutcome::Failed`], except statement
    /// errors (missing table or column, SQL syntax) which are fatal and
    /// terminate the process: they indicate a schema or programming bug,
    /// not a runtime data condition.
    pub fn insert_row(&self, table: &str, row: &Row) -> Result<ExecOutcome> {
        if row.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "cannot insert an empty row into '{table}'"
            )));
        }
        let columns: Vec<&str> = row.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(",");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(",")
        );
        let values: Vec<Value> = row.values().cloned().collect();
        Ok(self.run_mutation(&sql, &values, true))
    }

    /// Insert many rows in one multi-row statement.
    ///
    /// Significantly faster than repeated [`insert_row`](DataStore::insert_row)
    /// calls. An empty slice is a no-op that executes nothing. The column
    /// list is taken from the first row; all rows are expected to share
    /// it (a column missing from a later row binds NULL and logs a
    /// warning). Values go through the same typed binding as single
    /// insert, and the conflict/fatal split is the same.
    pub fn insert_many(&self, table: &str, rows: &[Row]) -> Result<ExecOutcome> {
        let Some(first) = rows.first() else {
            return Ok(ExecOutcome::Applied);
        };
        if first.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "cannot insert empty rows into '{table}'"
            )));
        }

        let columns: Vec<&str> = first.columns().collect();
        let tuple = format!("({})", vec!["?"; columns.len()].join(","));
        let tuples = vec![tuple; rows.len()].join(",");
        let sql = format!("INSERT INTO {table} ({}) VALUES {tuples}", columns.join(","));

        let mut values = Vec::with_capacity(columns.len() * rows.len());
        for row in rows {
            for column in &columns {
                match row.get(column) {
                    Some(value) => values.push(value.clone()),
                    None => {
                        warn!(table, column, "row is missing a column, binding NULL");
                        values.push(Value::Null);
                    }
                }
            }
        }
        Ok(self.run_mutation(&sql, &values, true))
    }

    /// Update a single column for the rows matching a condition.
    ///
    /// Fails with [`StoreError::InvalidArgument`] before any statement
    /// execution when the condition is empty. Execution errors are
    /// logged and reported via the outcome; the call never raises for
    /// them and never terminates the process. The statement commits on
    /// its own, so there is nothing to roll back on failure.
    pub fn update_cell(
        &self,
        table: &str,
        column: &str,
        new_value: &Value,
        condition: &Condition,
    ) -> Result<ExecOutcome> {
        let (clause, condition_params) = condition.to_where_clause()?;
        let sql = format!("UPDATE {table} SET {column} = ? WHERE {clause}");

        let mut values = Vec::with_capacity(condition_params.len() + 1);
        values.push(new_value.clone());
        values.extend(condition_params);
        Ok(self.run_mutation(&sql, &values, false))
    }

    /// Fetch all rows of an arbitrary query.
    ///
    /// The sole read path: the caller supplies the full query text and
    /// gets every result row as a [`Row`] in query column order. Returns
    /// an empty vec for no matches; a failing query surfaces as
    /// [`StoreError::Database`].
    pub fn get_all(&self, sql_query: &str) -> Result<Vec<Row>> {
        debug!(statement = sql_query, "query");
        let mut stmt = self.conn.prepare(sql_query)?;
        let column_names: Vec<String> =
            stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(result_row) = rows.next()? {
            let mut row = Row::new();
            for (index, name) in column_names.iter().enumerate() {
                row.insert(name, Value::from(result_row.get_ref(index)?));
            }
            out.push(row);
        }
        Ok(out)
    }

    /// Run arbitrary SQL with no result, for migrations and ad hoc
    /// statements.
    ///
    /// Commits on success. Every error is logged and swallowed: unlike
    /// the insert paths, this never raises and never terminates the
    /// process, since ad hoc statements are expected to fail on schema
    /// that migrations have not created yet.
    pub fn execute(&self, sql_text: &str) -> ExecOutcome {
        debug!(statement = sql_text, "execute");
        match self.conn.execute_batch(sql_text) {
            Ok(()) => ExecOutcome::Applied,
            Err(err) => match classify(&err) {
                Severity::Conflict => {
                    debug!(%err, statement = sql_text, "conflict ignored");
                    ExecOutcome::IgnoredConflict
                }
                _ => {
                    error!(%err, statement = sql_text, "raw statement failed");
                    ExecOutcome::Failed(err.to_string())
                }
            },
        }
    }

    /// Add a column to a table if it does not exist already.
    ///
    /// Introspects the current column set via `PRAGMA table_info` and
    /// issues `ALTER TABLE .. ADD COLUMN ..` only when the column is
    /// absent. Returns whether the column already existed, so idempotent
    /// migration scripts can tell "just created" from "already present".
    pub fn ensure_column(
        &self,
        table: &str,
        column: &str,
        declared_type: ColumnType,
    ) -> Result<bool> {
        let existed = {
            let mut stmt = self
                .conn
                .prepare(&format!("PRAGMA table_info({table})"))?;
            let mut columns = stmt.query([])?;
            let mut found = false;
            while let Some(info) = columns.next()? {
                let name: String = info.get("name")?;
                if name == column {
                    found = true;
                    break;
                }
            }
            found
        };

        if !existed {
            self.conn.execute(
                &format!("ALTER TABLE {table} ADD COLUMN {column} {declared_type}"),
                [],
            )?;
            info!(table, column, %declared_type, "added column");
        }
        Ok(existed)
    }

    /// Delete all rows from every table, after confirmation.
    ///
    /// Clears are irreversible and there is no cross-table atomicity:
    /// each table's delete commits independently, so a failure partway
    /// leaves earlier tables cleared. Returns the names of the cleared
    /// tables in order; a refusal at the prompt aborts with no mutation
    /// and returns an empty list.
    pub fn clear_all_tables(&mut self) -> Result<Vec<String>> {
        if !self.confirmed("Clear all data from ALL tables?") {
            return Ok(Vec::new());
        }

        let tables: Vec<String> = {
            let mut stmt = self
                .conn
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
            let names = stmt.query_map([], |row| row.get(0))?;
            names.collect::<std::result::Result<Vec<_>, _>>()?
        };

        let mut cleared = Vec::with_capacity(tables.len());
        for table in tables {
            self.conn.execute(&format!("DELETE FROM {table}"), [])?;
            info!(table = %table, "cleared table");
            cleared.push(table);
        }
        Ok(cleared)
    }

    /// Delete all rows from one table, after confirmation.
    ///
    /// Irreversible. Returns whether the deletion ran; `false` means the
    /// prompt was refused and nothing was touched.
    pub fn delete_all_rows(&mut self, table: &str) -> Result<bool> {
        if !self.confirmed(&format!("Delete all rows from '{table}'?")) {
            return Ok(false);
        }

        self.conn.execute(&format!("DELETE FROM {table}"), [])?;
        info!(table, "deleted all rows");
        Ok(true)
    }

    /// Ask the confirmer unless running unattended
    fn confirmed(&mut self, message: &str) -> bool {
        if self.unattended {
            return true;
        }
        let confirmed = self.confirmer.confirm(message);
        if !confirmed {
            warn!("delete aborted");
        }
        confirmed
    }

    /// Execute one mutating statement with bound parameters and classify
    /// the result. `fatal_allowed` gates the process-terminating tier;
    /// paths that historically recovered from every error pass false and
    /// get [`ExecOutcome::Failed`] instead.
    fn run_mutation(&self, sql: &str, params: &[Value], fatal_allowed: bool) -> ExecOutcome {
        debug!(statement = %render_statement(sql, params), "executing");
        match self.conn.execute(sql, params_from_iter(params.iter())) {
            Ok(_) => ExecOutcome::Applied,
            Err(err) => match classify(&err) {
                Severity::Conflict => {
                    debug!(%err, statement = sql, "conflict ignored");
                    ExecOutcome::IgnoredConflict
                }
                Severity::Fatal if fatal_allowed => {
                    error!(%err, statement = sql, "fatal statement error");
                    process::exit(1);
                }
                _ => {
                    error!(%err, statement = sql, "statement failed");
                    ExecOutcome::Failed(err.to_string())
                }
            },
        }
    }
}

/// Substitute bound parameters into statement text as SQL literals, for
/// trace logging only. A `?` inside a single-quoted span (raw predicates
/// may contain one) is text, not a placeholder. A parameter with no
/// literal form stays a `?`.
fn render_statement(sql: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut params = params.iter();
    let mut in_string = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                // A doubled quote inside a string toggles twice, which
                // leaves the state unchanged
                in_string = !in_string;
                out.push(ch);
            }
            '?' if !in_string => match params.next().and_then(Value::literal) {
                Some(lit) => out.push_str(&lit),
                None => out.push(ch),
            },
            _ => out.push(ch),
        }
    }
    out
}
