//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::state::App;

/// Creates a test App for a local panel, chatting as "alice".
pub fn test_app() -> App {
    App::new("localhost:8083".to_string(), "alice".to_string())
}
