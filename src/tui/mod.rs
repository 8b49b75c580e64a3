//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and performs the
//! `Effect`s the reducer asks for.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//!  keys ──▶ route_event ──┐
//!                         ├──▶ update(app, action) ──▶ Effect ──▶ Workers
//!  Action channel ◀───────┘                                        │
//!        ▲                                                         │
//!        └──── feed forwarder / HTTP tasks (tokio) ◀───────────────┘
//! ```
//!
//! Keys go to the first owner that wants them: an open notice, then the
//! confirmation dialog, then scrolling, then the input box.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop only draws after an input event or an
//! action from a background task, and otherwise sleeps in the poll.

mod component;
mod components;
mod event;
mod ui;

use chrono::Local;
use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use crate::admin::{AdminClient, PlayerAction, PlayerList, ServerAction};
use crate::channel::{
    ChannelMessage, FeedEvent, LiveFeed, ReconnectPolicy, Transport, WsTransport,
};
use crate::core::action::{Action, Effect, update};
use crate::core::config::{Credentials, ResolvedConfig};
use crate::core::state::App;
use crate::session::Session;
use crate::tui::component::EventHandler;
use crate::tui::components::{ChatLogState, ConfirmDialogState, ConfirmEvent, InputBox, InputEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub chat_log: ChatLogState,
    pub input_box: InputBox,
    /// Present exactly while `App::confirmation` is
    pub confirm: Option<ConfirmDialogState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            chat_log: ChatLogState::new(),
            input_box: InputBox::new(),
            confirm: None,
        }
    }

    /// Open or close the dialog state to match the app.
    fn sync(&mut self, app: &App) {
        match (&app.confirmation, &self.confirm) {
            (Some(_), None) => self.confirm = Some(ConfirmDialogState::new()),
            (None, Some(_)) => self.confirm = None,
            _ => {}
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Performs effects by spawning tokio tasks that report back as `Action`s.
struct Workers {
    admin: Arc<AdminClient>,
    transport: Arc<dyn Transport>,
    policy: ReconnectPolicy,
    credentials: Option<Credentials>,
    tx: mpsc::Sender<Action>,
    /// Outgoing chat for the current feed, if one was started
    chat_tx: Option<UnboundedSender<ChannelMessage>>,
}

impl Workers {
    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::None | Effect::Quit | Effect::ScrollToBottom => {}
            Effect::StartFeed => self.start_feed(),
            Effect::SendChat(message) => match &self.chat_tx {
                Some(chat_tx) => {
                    if chat_tx.send(message).is_err() {
                        warn!("Chat feed has stopped, message dropped");
                    }
                }
                None => warn!("No chat feed running, message dropped"),
            },
            Effect::Login => self.login(),
            Effect::Logout => {
                let admin = self.admin.clone();
                self.spawn(async move {
                    Action::LogoutFinished(admin.logout().await.map_err(|e| e.to_string()))
                });
            }
            Effect::RunServerAction(action) => self.server_action(action),
            Effect::RunPlayerAction { name, action } => self.player_action(name, action),
            Effect::FetchQuickMenu(name) => {
                let admin = self.admin.clone();
                self.spawn(async move {
                    let result = admin.quick_menu(&name).await.map_err(|e| {
                        warn!("Quick menu for {} failed: {}", name, e);
                        e.to_string()
                    });
                    Action::QuickMenuLoaded(result)
                });
            }
            Effect::FetchPlayerList(list) => self.player_list(list),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = Action> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = task.await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver task result: receiver dropped");
            }
        });
    }

    fn login(&self) {
        let Some(creds) = self.credentials.clone() else {
            warn!("Login requested without credentials");
            return;
        };
        let admin = self.admin.clone();
        self.spawn(async move {
            let result = admin
                .login(&creds.username, &creds.password)
                .await
                .map_err(|e| e.to_string());
            Action::LoginFinished(result)
        });
    }

    fn server_action(&self, action: ServerAction) {
        let admin = self.admin.clone();
        self.spawn(async move {
            let result = admin.server_action(action).await.map_err(|e| {
                warn!("Server action {:?} failed: {}", action, e);
                e.to_string()
            });
            Action::ServerActionFinished { action, result }
        });
    }

    fn player_action(&self, name: String, action: PlayerAction) {
        let admin = self.admin.clone();
        self.spawn(async move {
            let result = admin.player_action(&name, action).await.map_err(|e| {
                warn!("Player action {} {} failed: {}", action, name, e);
                e.to_string()
            });
            Action::PlayerActionFinished(result)
        });
    }

    fn player_list(&self, list: PlayerList) {
        let admin = self.admin.clone();
        self.spawn(async move {
            let result = admin.player_list(list).await.map_err(|e| {
                warn!("Loading {} failed: {}", list.description(), e);
                e.to_string()
            });
            Action::PlayerListLoaded { list, result }
        });
    }

    fn start_feed(&mut self) {
        let endpoint = match self.admin.session().chat_endpoint() {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("Cannot derive chat endpoint: {}", e);
                if self.tx.send(Action::ChannelUnavailable(e.to_string())).is_err() {
                    warn!("Failed to report chat endpoint error: receiver dropped");
                }
                return;
            }
        };

        info!("Starting chat feed on {}", endpoint);
        let feed = LiveFeed::new(endpoint, self.transport.clone(), self.policy);
        let (events_tx, mut events_rx) = unbounded_channel::<FeedEvent>();
        let (chat_tx, chat_rx) = unbounded_channel::<ChannelMessage>();
        self.chat_tx = Some(chat_tx);

        tokio::spawn(async move {
            let exit = feed.run(events_tx, chat_rx).await;
            info!("Chat feed stopped: {:?}", exit);
        });

        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if tx.send(feed_action(event)).is_err() {
                    debug!("UI gone, feed forwarder exiting");
                    return;
                }
            }
        });
    }
}

/// Map a feed report onto the reducer's vocabulary.
fn feed_action(event: FeedEvent) -> Action {
    match event {
        FeedEvent::Opened => Action::ChannelOpened,
        FeedEvent::Message(message) => Action::MessageReceived(message),
        FeedEvent::Rejected(e) => Action::MessageRejected(e.to_string()),
        FeedEvent::Closed => Action::ChannelClosed,
        FeedEvent::Retrying { attempt, delay } => Action::ChannelRetrying { attempt, delay },
        FeedEvent::GaveUp { attempts } => Action::ChannelGaveUp { attempts },
        FeedEvent::Unavailable(detail) => Action::ChannelUnavailable(detail),
    }
}

/// Run one action through the reducer and carry out its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, workers: &mut Workers, action: Action) -> bool {
    debug!("Dispatch: {:?}", action);
    let effect = update(app, action);
    tui.sync(app);
    match effect {
        Effect::Quit => return true,
        Effect::ScrollToBottom => tui.chat_log.scroll_to_bottom(),
        other => workers.perform(other),
    }
    false
}

/// Hand a terminal event to whoever owns the keyboard right now.
/// Returns true when the app should quit.
fn route_event(app: &mut App, tui: &mut TuiState, workers: &mut Workers, event: TuiEvent) -> bool {
    if matches!(event, TuiEvent::Resize) {
        return false;
    }

    // Ctrl+C always quits
    if matches!(event, TuiEvent::ForceQuit) {
        return dispatch(app, tui, workers, Action::Quit);
    }

    if app.current_notice().is_some() {
        if matches!(event, TuiEvent::Submit | TuiEvent::Escape) {
            return dispatch(app, tui, workers, Action::DismissNotice);
        }
        return false;
    }

    if tui.confirm.is_some() {
        let answer = tui.confirm.as_mut().and_then(|dialog| dialog.handle_event(&event));
        if let Some(ConfirmEvent::Answer(proceed)) = answer {
            return dispatch(app, tui, workers, Action::Confirm(proceed));
        }
        return false;
    }

    if matches!(
        event,
        TuiEvent::ScrollUp
            | TuiEvent::ScrollDown
            | TuiEvent::ScrollPageUp
            | TuiEvent::ScrollPageDown
            | TuiEvent::ScrollToBottom
    ) {
        tui.chat_log.handle_event(&event);
        return false;
    }

    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
        let at = Local::now().time();
        return dispatch(app, tui, workers, Action::Submit { text, at });
    }
    false
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let session = Session::new(&config.base_url).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid panel URL {:?}: {}", config.base_url, e),
        )
    })?;
    let admin = AdminClient::new(session.clone()).map_err(std::io::Error::other)?;
    let transport: Arc<dyn Transport> = Arc::new(WsTransport::new(session.clone()));

    let mut app = App::from_config(session.host(), &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut workers = Workers {
        admin: Arc::new(admin),
        transport,
        policy: config.reconnect,
        credentials: config.credentials.clone(),
        tx,
        chat_tx: None,
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Could not enable terminal modes: {}", e))
        .ok();

    let mut should_quit = dispatch(&mut app, &mut tui, &mut workers, Action::Startup);
    let mut needs_redraw = true;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Process first event + drain all pending events before next draw
        let first_event = poll_event_timeout(IDLE_POLL);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if route_event(&mut app, &mut tui, &mut workers, event) {
                should_quit = true;
                break;
            }
        }

        // Results from background tasks, in arrival order
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            should_quit = dispatch(&mut app, &mut tui, &mut workers, action);
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}
