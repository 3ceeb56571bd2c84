//! Destructive-statement confirmation gate.
//!
//! Any query mentioning `drop` (in any case) must be confirmed by typing the
//! exact phrase `DROP` before it is sent to the engine, unless the user has
//! disabled the check.

use std::fmt;

/// Substring that marks a query as destructive, compared case-insensitively.
pub const DESTRUCTIVE_KEYWORD: &str = "drop";

/// Phrase the user must type to confirm a destructive query.
pub const CONFIRM_PHRASE: &str = "DROP";

/// Returns true if the query text contains the destructive keyword.
pub fn is_destructive(query: &str) -> bool {
    query.to_lowercase().contains(DESTRUCTIVE_KEYWORD)
}

/// Decides whether launching `query` must stop for typed confirmation.
pub fn requires_confirmation(
    query: &str,
    confirmation_disabled: bool,
    already_confirmed: bool,
) -> bool {
    !confirmation_disabled && !already_confirmed && is_destructive(query)
}

/// State kept while the confirmation prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationContext {
    /// The query that will run once confirmed.
    pub pending_query_text: String,
    /// What the user has typed into the prompt so far.
    pub typed_phrase: String,
}

impl ConfirmationContext {
    /// Opens a prompt for `query` with nothing typed.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            pending_query_text: query.into(),
            typed_phrase: String::new(),
        }
    }

    /// Replaces the typed phrase (called on every keystroke).
    pub fn set_typed_phrase(&mut self, phrase: impl Into<String>) {
        self.typed_phrase = phrase.into();
    }

    /// Returns true when the typed phrase is exactly [`CONFIRM_PHRASE`].
    pub fn is_confirmed(&self) -> bool {
        self.typed_phrase == CONFIRM_PHRASE
    }
}

/// Lifecycle state of the execution controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    /// Nothing running, no prompt open.
    #[default]
    Idle,
    /// A destructive query is waiting for the typed confirmation.
    AwaitingConfirmation,
    /// A request is in flight.
    Executing,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingConfirmation => write!(f, "AwaitingConfirmation"),
            Self::Executing => write!(f, "Executing"),
        }
    }
}
