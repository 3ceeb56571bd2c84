//! Query launching for the editor pane.
//!
//! This module isolates the execution state machine from the host UI so it
//! can be driven by any editor, store, and engine.

pub mod executor;

pub use executor::{ExecutionController, LaunchOutcome};
