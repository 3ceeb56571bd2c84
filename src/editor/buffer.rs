//! Plain in-memory editor.
//!
//! Holds buffer text, an optional selection, and the registered completion
//! provider. Used by the CLI and by tests in place of a real widget.

use super::{CompletionProvider, EditorHost};
use crate::autocomplete::SuggestionEntry;
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct BufferState {
    text: String,
    selection: Option<Range<usize>>,
    provider: Option<Arc<dyn CompletionProvider>>,
}

/// An editor backed by a `String`.
#[derive(Default)]
pub struct BufferEditor {
    state: Mutex<BufferState>,
}

impl BufferEditor {
    /// Creates an editor holding `text` with nothing selected.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(BufferState {
                text: text.into(),
                ..BufferState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BufferState> {
        // The state holds no invariants a panicking writer could break.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Selects the byte range `range` of the buffer.
    pub fn select(&self, range: Range<usize>) {
        self.state().selection = Some(range);
    }

    /// Returns true when a completion provider is registered.
    pub fn has_completion_provider(&self) -> bool {
        self.state().provider.is_some()
    }

    /// Asks the registered provider for completions.
    ///
    /// Returns an empty list when nothing is registered.
    pub fn completions(&self, position: usize, prefix: &str) -> Vec<SuggestionEntry> {
        let provider = self.state().provider.clone();
        provider
            .map(|p| p.get_completions(position, prefix))
            .unwrap_or_default()
    }
}

impl EditorHost for BufferEditor {
    fn selected_text(&self) -> String {
        let state = self.state();
        state
            .selection
            .clone()
            .and_then(|range| state.text.get(range))
            .unwrap_or_default()
            .to_string()
    }

    fn value(&self) -> String {
        self.state().text.clone()
    }

    fn set_value(&self, text: &str) {
        let mut state = self.state();
        state.text = text.to_string();
        state.selection = None;
    }

    fn register_completion_provider(&self, provider: Arc<dyn CompletionProvider>) {
        self.state().provider = Some(provider);
    }
}
