//! Confirmation of destructive operations

use std::io::{self, BufRead, Write};

use tracing::warn;

/// Input accepted as an affirmative answer (case-insensitive)
pub const AFFIRMATIVE_INPUT: &str = "y";

/// Decides whether a destructive operation may proceed.
///
/// The store asks before clearing tables unless it was constructed in
/// unattended mode. Implementations other than [`StdinConfirm`] allow
/// non-interactive policies and test doubles.
pub trait ConfirmPrompt {
    /// Return true to let the operation proceed
    fn confirm(&mut self, message: &str) -> bool;
}

/// Interactive confirmation: prompt on stderr, answer on stdin.
///
/// Only a case-insensitive `y` counts as affirmative; anything else,
/// including a read failure, is a refusal.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        eprint!("CAUTION: {message} (y/n): ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            warn!("could not read confirmation answer, treating as refusal");
            return false;
        }
        answer.trim().eq_ignore_ascii_case(AFFIRMATIVE_INPUT)
    }
}
