//! Query launching with destructive-statement confirmation.
//!
//! The controller owns the pane's execution state machine:
//!
//! ```text
//! Idle --launch--> Executing --settle--> Idle
//! Idle --launch, destructive--> AwaitingConfirmation
//! AwaitingConfirmation --cancel--> Idle
//! AwaitingConfirmation --confirm "DROP"--> Executing
//! AwaitingConfirmation --confirm other--> AwaitingConfirmation (warning)
//! ```
//!
//! State sits behind a mutex that is never held across the engine call, so a
//! second launch while a request is in flight sees `Executing` and is dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::editor::{self, EditorHost};
use crate::engine::QueryEngine;
use crate::error::{LaunchError, Result};
use crate::notify::Notification;
use crate::persistence::{self, PersistencePort, QUERY_KEY};
use crate::report::{Reporter, Settled};
use crate::safety::{self, ConfirmationContext, ExecutionState};

/// What a launch, confirm, or re-launch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A request was already in flight; nothing happened.
    Busy,
    /// The query is destructive and now waits for the typed confirmation.
    AwaitingConfirmation { query: String },
    /// Confirm was pressed with the wrong phrase; the prompt stays open.
    PhraseMismatch,
    /// Confirm was pressed with no prompt open.
    NoPendingConfirmation,
    /// The query was dispatched and the engine call settled.
    Completed(Settled),
}

#[derive(Debug, Default)]
struct ControllerState {
    state: ExecutionState,
    loading: bool,
    current_query: String,
    confirmation: Option<ConfirmationContext>,
    statistics: String,
}

/// Drives one query pane: reads the query, gates it, runs it, reports it.
pub struct ExecutionController {
    editor: Arc<dyn EditorHost>,
    store: Arc<dyn PersistencePort>,
    engine: Arc<dyn QueryEngine>,
    reporter: Reporter,
    inner: Mutex<ControllerState>,
}

impl ExecutionController {
    /// Creates an idle controller.
    pub fn new(
        editor: Arc<dyn EditorHost>,
        store: Arc<dyn PersistencePort>,
        engine: Arc<dyn QueryEngine>,
        reporter: Reporter,
    ) -> Self {
        Self {
            editor,
            store,
            engine,
            reporter,
            inner: Mutex::new(ControllerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // Every transition is written in a single critical section, so a
        // poisoned guard still holds a consistent state.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Restores the last buffer text from the store into the editor.
    pub fn on_load(&self) -> Result<String> {
        let text = self.store.get(QUERY_KEY)?.unwrap_or_default();
        self.editor.set_value(&text);
        debug!(bytes = text.len(), "restored editor buffer");
        Ok(text)
    }

    /// Persists the buffer text after an edit.
    pub fn on_change(&self, text: &str) -> Result<()> {
        self.store.set(QUERY_KEY, text)
    }

    /// Launches the selection, or the whole buffer when nothing is selected.
    pub async fn launch(&self) -> LaunchOutcome {
        let request = editor::get_query(self.editor.as_ref());
        debug!(
            selection_scoped = request.selection_scoped,
            "launching query"
        );
        self.execute(&request.text, false).await
    }

    /// Runs `query` unless a request is already in flight or the gate stops it.
    pub async fn execute(&self, query: &str, already_confirmed: bool) -> LaunchOutcome {
        let confirmation_disabled = persistence::confirmation_disabled(self.store.as_ref());

        {
            let mut inner = self.lock();
            if inner.loading {
                debug!("query already executing, ignoring launch");
                return LaunchOutcome::Busy;
            }

            inner.current_query = query.to_string();

            if safety::requires_confirmation(query, confirmation_disabled, already_confirmed) {
                info!("destructive query held for confirmation");
                inner.state = ExecutionState::AwaitingConfirmation;
                inner.confirmation = Some(ConfirmationContext::new(query));
                return LaunchOutcome::AwaitingConfirmation {
                    query: query.to_string(),
                };
            }

            inner.confirmation = None;
            inner.state = ExecutionState::Executing;
            inner.loading = true;
        }

        self.dispatch(query).await
    }

    // Caller must already have moved the state to `Executing` under the lock.
    async fn dispatch(&self, query: &str) -> LaunchOutcome {
        info!(bytes = query.len(), "dispatching query");
        let result = self.engine.execute_query(query).await;
        let settled = self.reporter.report(result);

        {
            let mut inner = self.lock();
            inner.statistics = settled.statistics().to_string();
            inner.state = ExecutionState::Idle;
            inner.loading = false;
        }
        debug!("query settled");

        LaunchOutcome::Completed(settled)
    }

    /// Records what the user has typed into the confirmation prompt.
    ///
    /// Returns false when no prompt is open.
    pub fn set_typed_phrase(&self, phrase: &str) -> bool {
        match self.lock().confirmation.as_mut() {
            Some(ctx) => {
                ctx.set_typed_phrase(phrase);
                true
            }
            None => false,
        }
    }

    /// Confirms the pending destructive query.
    ///
    /// Runs it only if the typed phrase is exactly `DROP`; otherwise shows a
    /// warning and keeps the prompt open. The prompt is closed and the pane
    /// marked as executing in one step, so a racing launch sees `Busy`.
    pub async fn confirm(&self) -> LaunchOutcome {
        let pending = {
            let mut inner = self.lock();
            if inner.loading {
                return LaunchOutcome::Busy;
            }
            match inner.confirmation.take() {
                None => return LaunchOutcome::NoPendingConfirmation,
                Some(ctx) if ctx.is_confirmed() => {
                    inner.current_query = ctx.pending_query_text.clone();
                    inner.state = ExecutionState::Executing;
                    inner.loading = true;
                    Some(ctx.pending_query_text)
                }
                Some(ctx) => {
                    inner.confirmation = Some(ctx);
                    None
                }
            }
        };

        match pending {
            Some(query) => self.dispatch(&query).await,
            None => {
                warn!("confirmation phrase mismatch");
                self.reporter.notify(Notification::warning(
                    LaunchError::ConfirmationMismatch.notification_message(),
                    self.reporter.transient_timeout(),
                ));
                LaunchOutcome::PhraseMismatch
            }
        }
    }

    /// Closes the confirmation prompt without running anything.
    ///
    /// Returns false when no prompt was open.
    pub fn cancel(&self) -> bool {
        let mut inner = self.lock();
        if inner.state != ExecutionState::AwaitingConfirmation {
            return false;
        }
        inner.confirmation = None;
        inner.state = ExecutionState::Idle;
        inner.loading = false;
        debug!("confirmation cancelled");
        true
    }

    pub fn state(&self) -> ExecutionState {
        self.lock().state
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The most recently launched query text.
    pub fn current_query(&self) -> String {
        self.lock().current_query.clone()
    }

    /// The statistics line from the last settled query (empty unless it returned data).
    pub fn statistics(&self) -> String {
        self.lock().statistics.clone()
    }

    /// The open confirmation prompt, if any.
    pub fn confirmation(&self) -> Option<ConfirmationContext> {
        self.lock().confirmation.clone()
    }
}
