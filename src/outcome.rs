//! Per-call status of mutating operations

use serde::{Deserialize, Serialize};

/// Outcome of a mutating statement.
///
/// Mutating operations never raise for execution-time failures; instead
/// they report one of these. Conflicts keep their insert-if-not-exists
/// semantics but become observable, and recoverable failures carry the
/// engine's message so callers and tests do not have to scrape logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecOutcome {
    /// The statement executed and committed
    Applied,
    /// A uniqueness or primary-key conflict was swallowed; no rows changed
    IgnoredConflict,
    /// A recoverable execution error occurred; the detail is the engine message
    Failed(String),
}

impl ExecOutcome {
    /// Check if the statement executed and committed
    pub fn is_applied(&self) -> bool {
        matches!(self, ExecOutcome::Applied)
    }

    /// Check if a conflict was swallowed
    pub fn is_ignored_conflict(&self) -> bool {
        matches!(self, ExecOutcome::IgnoredConflict)
    }

    /// Check if the statement failed recoverably
    pub fn is_failed(&self) -> bool {
        matches!(self, ExecOutcome::Failed(_))
    }
}
