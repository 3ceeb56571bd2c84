//! Integration tests for query-launch.

pub mod autocomplete_test;
pub mod launch_test;
pub mod persistence_test;
