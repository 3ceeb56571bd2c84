//! query-launch - selection-aware query launching for an editor pane.
//!
//! Reads the query from the editor, holds destructive statements behind a
//! typed confirmation, runs the query against a remote engine, and reports
//! statistics or failures. Also builds the editor's autocomplete suggestions
//! from the schema catalog.

pub mod autocomplete;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notify;
pub mod persistence;
pub mod query;
pub mod report;
pub mod safety;
