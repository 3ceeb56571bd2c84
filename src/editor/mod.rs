//! Editor capability interface and query source reading.
//!
//! The concrete text widget is abstracted behind [`EditorHost`]; the pane only
//! needs the selection, the buffer value, and a place to hang a completion
//! provider.

mod buffer;

pub use buffer::BufferEditor;

use crate::autocomplete::SuggestionEntry;
use std::sync::Arc;

/// Source of completions for the editor's language service.
pub trait CompletionProvider: Send + Sync {
    /// Returns completions for the cursor at byte offset `position` with the
    /// word fragment `prefix` under it.
    fn get_completions(&self, position: usize, prefix: &str) -> Vec<SuggestionEntry>;
}

/// What the query pane needs from a text editor.
pub trait EditorHost: Send + Sync {
    /// Returns the currently selected text, or an empty string.
    fn selected_text(&self) -> String;

    /// Returns the full buffer text.
    fn value(&self) -> String;

    /// Replaces the full buffer text.
    fn set_value(&self, text: &str);

    /// Installs `provider`, replacing any previously registered provider.
    fn register_completion_provider(&self, provider: Arc<dyn CompletionProvider>);
}

/// The text to execute for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Query text sent to the engine.
    pub text: String,
    /// True when `text` came from the selection rather than the whole buffer.
    pub selection_scoped: bool,
}

/// Reads the query to execute: the selection if non-empty, else the buffer.
pub fn get_query(editor: &dyn EditorHost) -> QueryRequest {
    let selected = editor.selected_text();
    if !selected.is_empty() {
        return QueryRequest {
            text: selected,
            selection_scoped: true,
        };
    }

    QueryRequest {
        text: editor.value(),
        selection_scoped: false,
    }
}
