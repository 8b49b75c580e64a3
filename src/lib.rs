//! Helmsman library exports for testing

pub mod admin;
pub mod channel;
pub mod core;
pub mod session;
pub mod tui;

#[cfg(test)]
pub mod test_support;
