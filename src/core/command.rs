//! # Operator Commands
//!
//! Turns a line from the input box into a [`Command`]. Anything not
//! starting with `/` is chat. A player name is the rest of the line after
//! the command word, so names with spaces survive.

use std::fmt;

use crate::admin::{PlayerAction, PlayerList, ServerAction};

pub const HELP_TEXT: &str = "\
/stop, /restart       stop or restart the server
/kick P, /ban P       kick or ban player P
/unban P, /delete P   unban or delete player P
/menu P               quick menu for player P
/online, /players     list online or all known players
/name N               set your chat name
/login, /logout       log in or out of the panel
/reconnect            reopen the chat after it gave up
/quit                 exit
Anything else is sent to the chat.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Server(ServerAction),
    Player { name: String, action: PlayerAction },
    QuickMenu(String),
    Players(PlayerList),
    SetAuthor(String),
    Login,
    Logout,
    Reconnect,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { command: String, usage: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => {
                write!(f, "Unknown command /{word}. Type /help for a list.")
            }
            CommandError::MissingArgument { usage, .. } => write!(f, "Usage: {usage}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (rest.trim_end(), ""),
    };

    let needs_arg = |usage: &'static str| -> Result<String, CommandError> {
        if arg.is_empty() {
            Err(CommandError::MissingArgument {
                command: word.to_string(),
                usage,
            })
        } else {
            Ok(arg.to_string())
        }
    };

    if let Some(action) = PlayerAction::parse(word) {
        let usage = match action {
            PlayerAction::Kick => "/kick <player>",
            PlayerAction::Ban => "/ban <player>",
            PlayerAction::Unban => "/unban <player>",
            PlayerAction::Delete => "/delete <player>",
        };
        return Ok(Command::Player {
            name: needs_arg(usage)?,
            action,
        });
    }

    match word {
        "stop" => Ok(Command::Server(ServerAction::Stop)),
        "restart" => Ok(Command::Server(ServerAction::Restart)),
        "menu" => Ok(Command::QuickMenu(needs_arg("/menu <player>")?)),
        "online" => Ok(Command::Players(PlayerList::Online)),
        "players" => Ok(Command::Players(PlayerList::Known)),
        "name" => Ok(Command::SetAuthor(needs_arg("/name <name>")?)),
        "login" => Ok(Command::Login),
        "logout" => Ok(Command::Logout),
        "reconnect" => Ok(Command::Reconnect),
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
