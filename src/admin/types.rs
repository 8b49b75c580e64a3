use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-server actions. Both are one-way from the client's point of view:
/// the panel goes away (stop) or bounces (restart) after handling them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    Stop,
    Restart,
}

impl ServerAction {
    /// Path the panel serves the action on.
    pub fn path(&self) -> &'static str {
        match self {
            ServerAction::Stop => "/stopserver",
            ServerAction::Restart => "/restart",
        }
    }

    /// Phrase used in prompts: "Are you sure you want to {description}?"
    pub fn description(&self) -> &'static str {
        match self {
            ServerAction::Stop => "stop the server",
            ServerAction::Restart => "restart the server",
        }
    }
}

/// The panel's pre-rendered player listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerList {
    /// Players connected right now.
    Online,
    /// Every player the server has seen.
    Known,
}

impl PlayerList {
    pub fn path(&self) -> &'static str {
        match self {
            PlayerList::Online => "ajax/playerlistonline.html",
            PlayerList::Known => "ajax/playerlist.html",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlayerList::Online => "online players",
            PlayerList::Known => "known players",
        }
    }
}

/// Actions on a single player record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Kick,
    Ban,
    Unban,
    Delete,
}

impl PlayerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::Kick => "kick",
            PlayerAction::Ban => "ban",
            PlayerAction::Unban => "unban",
            PlayerAction::Delete => "delete",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "kick" => Some(PlayerAction::Kick),
            "ban" => Some(PlayerAction::Ban),
            "unban" => Some(PlayerAction::Unban),
            "delete" => Some(PlayerAction::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form body of `POST ajax/playeraction`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// The player the action targets.
    pub info: String,
    pub action: String,
    #[serde(rename = "_xsrf")]
    pub xsrf: String,
}

impl ActionRequest {
    pub fn new(player: &str, action: PlayerAction, xsrf: String) -> Self {
        Self {
            info: player.to_string(),
            action: action.as_str().to_string(),
            xsrf,
        }
    }
}

/// JSON answer to a player action.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: String,
    pub msg: String,
}

impl ActionResponse {
    /// Only the literal `"ERROR"` status counts as a rejection.
    pub fn is_error(&self) -> bool {
        self.status == "ERROR"
    }
}
