//! # Confirmation
//!
//! Destructive panel operations never run straight from a command. They
//! become a [`PendingConfirmation`] first, and only a "yes" from the
//! operator turns it back into the action to perform.

use crate::admin::{PlayerAction, ServerAction};

/// An operation that needs the operator's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    Server(ServerAction),
    Player { name: String, action: PlayerAction },
}

impl AdminAction {
    pub fn prompt(&self) -> String {
        match self {
            AdminAction::Server(action) => {
                format!("Are you sure you want to {}?", action.description())
            }
            AdminAction::Player { name, action } => {
                format!("Are you sure you want to {} {}?", action, name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub prompt: String,
    pub action: AdminAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Proceed(AdminAction),
    Canceled,
}

impl PendingConfirmation {
    pub fn new(action: AdminAction) -> Self {
        Self {
            prompt: action.prompt(),
            action,
        }
    }

    pub fn resolve(self, proceed: bool) -> Resolution {
        if proceed {
            Resolution::Proceed(self.action)
        } else {
            Resolution::Canceled
        }
    }
}
