//! # Panel Administration
//!
//! The HTTP half of the client: login/logout, server-level actions
//! (stop, restart), player actions (kick, ban, unban, delete), the
//! player quick menu and the player listings.
//!
//! The confirmation step in front of the destructive calls lives in
//! `core::confirm`; this module only performs the request once the
//! operator has said yes.

pub mod client;
pub mod error;
pub mod types;

pub use client::AdminClient;
pub use error::AdminError;
pub use types::{ActionRequest, ActionResponse, PlayerAction, PlayerList, ServerAction};
