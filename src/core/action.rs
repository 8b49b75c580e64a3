//! # Actions
//!
//! Everything that can happen in Helmsman becomes an `Action`.
//! Operator presses Enter? That's `Action::Submit`.
//! A chat frame arrives? That's `Action::MessageReceived(message)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns the [`Effect`] the event loop should perform.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::time::Duration;

use chrono::NaiveTime;
use log::{debug, info, warn};

use crate::admin::{ActionResponse, PlayerAction, PlayerList, ServerAction};
use crate::channel::ChannelMessage;
use crate::core::command::{self, Command, HELP_TEXT};
use crate::core::confirm::{AdminAction, PendingConfirmation, Resolution};
use crate::core::notice::{ACTION_FAILED_TEXT, Notice, UNSUPPORTED_TEXT};
use crate::core::state::{App, ChannelStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Startup,
    /// A line from the input box, with the local time it was submitted.
    Submit { text: String, at: NaiveTime },
    /// Operator's answer to the pending confirmation.
    Confirm(bool),
    DismissNotice,

    // Live feed
    ChannelOpened,
    MessageReceived(ChannelMessage),
    MessageRejected(String),
    ChannelClosed,
    ChannelRetrying { attempt: u32, delay: Duration },
    ChannelGaveUp { attempts: u32 },
    ChannelUnavailable(String),

    // Panel requests
    LoginFinished(Result<(), String>),
    LogoutFinished(Result<(), String>),
    ServerActionFinished {
        action: ServerAction,
        result: Result<(), String>,
    },
    PlayerActionFinished(Result<ActionResponse, String>),
    QuickMenuLoaded(Result<String, String>),
    PlayerListLoaded {
        list: PlayerList,
        result: Result<String, String>,
    },

    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    ScrollToBottom,
    SendChat(ChannelMessage),
    RunServerAction(ServerAction),
    RunPlayerAction { name: String, action: PlayerAction },
    FetchQuickMenu(String),
    FetchPlayerList(PlayerList),
    Login,
    Logout,
    StartFeed,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Startup => {
            if app.has_credentials {
                app.status_message = "Logging in...".to_string();
                Effect::Login
            } else {
                start_feed(app)
            }
        }
        Action::Submit { text, at } => {
            if text.trim().is_empty() {
                return Effect::None;
            }
            match command::parse(&text) {
                Ok(cmd) => run_command(app, cmd, at),
                Err(e) => {
                    app.push_notice(Notice::error(e.to_string()));
                    Effect::None
                }
            }
        }
        Action::Confirm(proceed) => {
            // Cleared before either branch acts
            let Some(pending) = app.confirmation.take() else {
                return Effect::None;
            };
            match pending.resolve(proceed) {
                Resolution::Proceed(AdminAction::Server(action)) => {
                    app.status_message = format!("Asking the panel to {}...", action.description());
                    Effect::RunServerAction(action)
                }
                Resolution::Proceed(AdminAction::Player { name, action }) => {
                    app.status_message = format!("Sending {} {}...", action, name);
                    Effect::RunPlayerAction { name, action }
                }
                Resolution::Canceled => {
                    app.push_notice(Notice::canceled());
                    Effect::None
                }
            }
        }
        Action::DismissNotice => {
            app.notices.pop_front();
            Effect::None
        }

        Action::ChannelOpened => {
            app.channel = ChannelStatus::Online;
            app.status_message = "Chat connected".to_string();
            Effect::None
        }
        Action::MessageReceived(message) => {
            app.log.push(message);
            Effect::ScrollToBottom
        }
        Action::MessageRejected(reason) => {
            app.status_message = format!("Dropped malformed chat message: {}", reason);
            Effect::None
        }
        Action::ChannelClosed => {
            app.channel = ChannelStatus::Connecting;
            app.status_message = "Chat connection closed".to_string();
            Effect::None
        }
        Action::ChannelRetrying { attempt, delay } => {
            app.channel = ChannelStatus::Retrying {
                attempt,
                delay_ms: delay.as_millis() as u64,
            };
            Effect::None
        }
        Action::ChannelGaveUp { attempts } => {
            app.channel = ChannelStatus::Offline;
            app.push_notice(Notice::error(format!(
                "Chat connection lost after {} retries. Type /reconnect to try again.",
                attempts
            )));
            Effect::None
        }
        Action::ChannelUnavailable(detail) => {
            info!("Chat unavailable: {}", detail);
            app.channel = ChannelStatus::Unavailable;
            app.push_notice(Notice::alert(UNSUPPORTED_TEXT));
            Effect::None
        }

        Action::LoginFinished(result) => {
            match result {
                Ok(()) => {
                    app.logged_in = true;
                    app.status_message = "Logged in".to_string();
                }
                Err(e) => {
                    app.logged_in = false;
                    app.push_notice(Notice::error(format!("Login failed: {}", e)));
                }
            }
            // First login gates the feed; later logins leave it alone
            if app.channel == ChannelStatus::Idle {
                start_feed(app)
            } else {
                Effect::None
            }
        }
        Action::LogoutFinished(result) => {
            match result {
                Ok(()) => {
                    app.logged_in = false;
                    app.push_notice(Notice::info("Logged out."));
                }
                Err(e) => app.push_notice(Notice::error(format!("Logout failed: {}", e))),
            }
            Effect::None
        }
        Action::ServerActionFinished { action, result } => {
            match result {
                Ok(()) => app.push_notice(Notice::info(format!(
                    "Request to {} was sent.",
                    action.description()
                ))),
                Err(e) => app.push_notice(Notice::error(format!(
                    "Could not {}: {}",
                    action.description(),
                    e
                ))),
            }
            Effect::None
        }
        Action::PlayerActionFinished(result) => {
            match result {
                Ok(response) if response.is_error() => app.push_notice(Notice::error(response.msg)),
                Ok(response) => app.push_notice(Notice::success(response.msg)),
                Err(e) => {
                    warn!("Player action failed: {}", e);
                    app.push_notice(Notice::error(ACTION_FAILED_TEXT));
                }
            }
            Effect::None
        }
        Action::QuickMenuLoaded(result) => {
            match result {
                Ok(body) => app.push_notice(Notice::info(body)),
                Err(e) => app.push_notice(Notice::error(format!("Could not load quick menu: {}", e))),
            }
            Effect::None
        }

        Action::PlayerListLoaded { list, result } => {
            match result {
                Ok(body) => app.push_notice(Notice::info(body)),
                Err(e) => app.push_notice(Notice::error(format!(
                    "Could not load {}: {}",
                    list.description(),
                    e
                ))),
            }
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

fn run_command(app: &mut App, cmd: Command, at: NaiveTime) -> Effect {
    debug!("Command: {:?}", cmd);
    match cmd {
        Command::Say(body) => send_chat(app, &body, at),
        Command::Server(action) => {
            ask(app, AdminAction::Server(action));
            Effect::None
        }
        Command::Player { name, action } => {
            ask(app, AdminAction::Player { name, action });
            Effect::None
        }
        Command::QuickMenu(name) => Effect::FetchQuickMenu(name),
        Command::Players(list) => Effect::FetchPlayerList(list),
        Command::SetAuthor(name) => {
            app.status_message = format!("Chatting as {}", name);
            app.author = name;
            Effect::None
        }
        Command::Login => {
            if app.has_credentials {
                app.status_message = "Logging in...".to_string();
                Effect::Login
            } else {
                app.push_notice(Notice::error(
                    "No credentials configured. Set username and password under [server].",
                ));
                Effect::None
            }
        }
        Command::Logout => Effect::Logout,
        Command::Reconnect => match app.channel {
            ChannelStatus::Offline | ChannelStatus::Idle => start_feed(app),
            ChannelStatus::Disabled => {
                app.status_message = "Chat is disabled in the config".to_string();
                Effect::None
            }
            ChannelStatus::Unavailable => {
                app.status_message = "Chat is not available with this client".to_string();
                Effect::None
            }
            _ => {
                app.status_message = "Chat is already running".to_string();
                Effect::None
            }
        },
        Command::Help => {
            app.push_notice(Notice::info(HELP_TEXT));
            Effect::None
        }
        Command::Quit => Effect::Quit,
    }
}

fn ask(app: &mut App, action: AdminAction) {
    // Only one prompt at a time; the newest request replaces an unanswered one
    app.confirmation = Some(PendingConfirmation::new(action));
}

fn send_chat(app: &mut App, body: &str, at: NaiveTime) -> Effect {
    let Some(message) = ChannelMessage::outbound(&app.author, body, at) else {
        app.status_message = "Set your chat name with /name first".to_string();
        return Effect::None;
    };
    if app.channel != ChannelStatus::Online {
        warn!("Chat {}, message not sent", app.channel.label());
        app.status_message = format!("Chat is {}, message not sent", app.channel.label());
        return Effect::None;
    }
    Effect::SendChat(message)
}

fn start_feed(app: &mut App) -> Effect {
    // One feed at a time
    if app.channel.is_running() {
        debug!("Chat feed already {}", app.channel.label());
        return Effect::None;
    }
    if !app.chat_enabled {
        app.channel = ChannelStatus::Disabled;
        return Effect::None;
    }
    app.channel = ChannelStatus::Connecting;
    Effect::StartFeed
}
