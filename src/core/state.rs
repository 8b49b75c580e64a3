//! # Application State
//!
//! Core business state for Helmsman. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── log: Vec<ChannelMessage>                // chat log, arrival order
//! ├── notices: VecDeque<Notice>               // FIFO, front is shown
//! ├── confirmation: Option<PendingConfirmation>
//! ├── author: String                          // chat name for outgoing lines
//! ├── channel: ChannelStatus                  // live feed state
//! ├── status_message: String                  // status bar text
//! ├── server_label: String                    // panel host for the title bar
//! ├── chat_enabled: bool
//! ├── logged_in: bool
//! └── has_credentials: bool
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::VecDeque;

use crate::channel::ChannelMessage;
use crate::core::config::ResolvedConfig;
use crate::core::confirm::PendingConfirmation;
use crate::core::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// Not started yet (waiting on login, or never asked).
    Idle,
    Connecting,
    Online,
    Retrying { attempt: u32, delay_ms: u64 },
    /// Gave up reconnecting. `/reconnect` starts over.
    Offline,
    /// Transport can't serve the endpoint. Terminal.
    Unavailable,
    /// Turned off in config.
    Disabled,
}

impl ChannelStatus {
    pub fn label(&self) -> String {
        match self {
            ChannelStatus::Idle => "idle".to_string(),
            ChannelStatus::Connecting => "connecting".to_string(),
            ChannelStatus::Online => "online".to_string(),
            ChannelStatus::Retrying { delay_ms, .. } => {
                format!("retrying in {:.1}s", *delay_ms as f64 / 1000.0)
            }
            ChannelStatus::Offline => "offline".to_string(),
            ChannelStatus::Unavailable => "unavailable".to_string(),
            ChannelStatus::Disabled => "disabled".to_string(),
        }
    }

    /// True while a feed task is alive for this status.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            ChannelStatus::Connecting | ChannelStatus::Online | ChannelStatus::Retrying { .. }
        )
    }
}

pub struct App {
    pub log: Vec<ChannelMessage>,
    pub notices: VecDeque<Notice>,
    pub confirmation: Option<PendingConfirmation>,
    pub author: String,
    pub channel: ChannelStatus,
    pub status_message: String,
    pub server_label: String,
    pub chat_enabled: bool,
    pub logged_in: bool,
    pub has_credentials: bool,
}

impl App {
    pub fn new(server_label: String, author: String) -> Self {
        Self {
            log: Vec::new(),
            notices: VecDeque::new(),
            confirmation: None,
            author,
            channel: ChannelStatus::Idle,
            status_message: String::from("Welcome to Helmsman! Type /help for commands."),
            server_label,
            chat_enabled: true,
            logged_in: false,
            has_credentials: false,
        }
    }

    pub fn from_config(server_label: String, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(server_label, config.author.clone());
        app.chat_enabled = config.chat_enabled;
        app.has_credentials = config.credentials.is_some();
        if !config.chat_enabled {
            app.channel = ChannelStatus::Disabled;
        }
        app
    }

    /// The notice currently on screen, if any.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}
