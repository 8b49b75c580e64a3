//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: Top status bar with panel host, chat state and author
//! - `ChatEntry`: One chat log line
//! - `NoticePopup`: The notice at the front of the queue
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep state across frames and emit events:
//! - `InputBox`: Single-line editor for chat and commands
//! - `ChatLog`: Scrollable chat log with layout caching
//! - `ConfirmDialog`: Ok/Cancel prompt for destructive actions
//!
//! Stateful components split into a persistent `…State` stored in
//! `TuiState` and a transient wrapper built each frame with borrowed
//! state and props.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (Top status bar)
//! ├── chat_entry.rs      (Single chat line)
//! ├── chat_log.rs        (Scrollable chat log)
//! ├── notice_popup.rs    (Notice overlay)
//! ├── confirm_dialog.rs  (Ok/Cancel overlay)
//! └── input_box/         (Line editor)
//! ```

use ratatui::layout::{Constraint, Flex, Layout, Rect};

mod title_bar;
pub use title_bar::TitleBar;

pub mod chat_entry;
pub mod chat_log;
pub mod confirm_dialog;
pub mod input_box;
pub mod notice_popup;

pub use chat_log::{ChatLog, ChatLogState};
pub use confirm_dialog::{ConfirmDialog, ConfirmDialogState, ConfirmEvent};
pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub use notice_popup::NoticePopup;

/// A `width` x `height` rect centered in `outer`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [center_v] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(center_v);
    center
}
