//! # Core Application Logic
//!
//! This module contains Helmsman's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  channel   │      │   admin    │
//!     │  Adapter   │      │ (ws feed)  │      │  (HTTP)    │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`command`]: Parses what the operator types
//! - [`confirm`]: The confirm-then-act step for destructive operations
//! - [`notice`]: One-shot notifications
//! - [`config`]: Layered configuration

pub mod action;
pub mod command;
pub mod config;
pub mod confirm;
pub mod notice;
pub mod state;
