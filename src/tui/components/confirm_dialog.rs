//! # ConfirmDialog Component
//!
//! The Ok/Cancel prompt in front of destructive panel actions.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConfirmDialogState` lives in `TuiState` while a prompt is open
//! - `ConfirmDialog` is created each frame with the prompt text
//!
//! Cancel is preselected. Tab or the arrow keys move between the buttons,
//! Enter answers with the highlighted one, `y`/`n` answer directly and Esc
//! cancels.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

const DIALOG_WIDTH: u16 = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice {
    Ok,
    #[default]
    Cancel,
}

impl Choice {
    fn toggle(self) -> Self {
        match self {
            Choice::Ok => Choice::Cancel,
            Choice::Cancel => Choice::Ok,
        }
    }
}

/// Emitted once per prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Answer(bool),
}

#[derive(Debug, Default)]
pub struct ConfirmDialogState {
    pub selected: Choice,
}

impl ConfirmDialogState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for ConfirmDialogState {
    type Event = ConfirmEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Tab | TuiEvent::CursorLeft | TuiEvent::CursorRight => {
                self.selected = self.selected.toggle();
                None
            }
            TuiEvent::Submit => Some(ConfirmEvent::Answer(self.selected == Choice::Ok)),
            TuiEvent::Escape => Some(ConfirmEvent::Answer(false)),
            TuiEvent::InputChar('y' | 'Y') => Some(ConfirmEvent::Answer(true)),
            TuiEvent::InputChar('n' | 'N') => Some(ConfirmEvent::Answer(false)),
            _ => None,
        }
    }
}

pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
    prompt: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmDialogState, prompt: &'a str) -> Self {
        Self { state, prompt }
    }

    fn button(&self, label: &'static str, choice: Choice) -> Span<'static> {
        let style = if self.state.selected == choice {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(label, style)
    }
}

impl<'a> Component for ConfirmDialog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = DIALOG_WIDTH.min(area.width);
        let prompt = Paragraph::new(self.prompt)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        // borders + padding take 4 columns
        let prompt_rows = prompt.line_count(width.saturating_sub(4)) as u16;
        // borders (2) + prompt + gap (1) + buttons (1)
        let height = (prompt_rows + 4).min(area.height);
        let dialog = centered_rect(width, height, area);

        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Confirm ")
            .title_bottom(Line::from(" Tab Switch  Enter Choose  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [prompt_area, _, buttons_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(prompt, prompt_area);

        let buttons = Line::from(vec![
            self.button("[ Ok ]", Choice::Ok),
            Span::raw("   "),
            self.button("[ Cancel ]", Choice::Cancel),
        ])
        .centered();
        frame.render_widget(buttons, buttons_area);
    }
}
