//! # TitleBar Component
//!
//! Top status bar: panel host, chat state, who we chat as, whether the
//! panel session is logged in, and the latest status message.
//!
//! Stateless. Everything arrives as props, so it can be built fresh each
//! frame from `App` and `TuiState`:
//!
//! ```text
//! Helmsman @ localhost:8083 | chat: online | as alice | logged in | Chat connected | ↓ New
//! ```
//!
//! Segments with nothing to say are left out, and the "↓ New" marker only
//! appears when the chat log has lines below the current scroll position.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::state::ChannelStatus;
use crate::tui::component::Component;

pub struct TitleBar {
    pub server: String,
    pub channel: ChannelStatus,
    pub author: String,
    pub logged_in: bool,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        server: String,
        channel: ChannelStatus,
        author: String,
        logged_in: bool,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            server,
            channel,
            author,
            logged_in,
            status_message,
            has_unseen_content,
        }
    }

    fn channel_style(&self) -> Style {
        match self.channel {
            ChannelStatus::Online => Style::default().fg(Color::Green),
            ChannelStatus::Connecting | ChannelStatus::Retrying { .. } => {
                Style::default().fg(Color::Yellow)
            }
            ChannelStatus::Offline | ChannelStatus::Unavailable => Style::default().fg(Color::Red),
            ChannelStatus::Idle | ChannelStatus::Disabled => Style::default().fg(Color::DarkGray),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sep = || Span::raw(" | ");

        let mut spans = vec![
            Span::raw(format!("Helmsman @ {}", self.server)),
            sep(),
            Span::styled(format!("chat: {}", self.channel.label()), self.channel_style()),
        ];

        if !self.author.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(format!("as {}", self.author)));
        }
        if self.logged_in {
            spans.push(sep());
            spans.push(Span::styled("logged in", Style::default().fg(Color::Green)));
        }
        if !self.status_message.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(self.status_message.clone()));
        }
        if self.has_unseen_content {
            spans.push(sep());
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_shows_everything() {
        let mut title_bar = TitleBar::new(
            "localhost:8083".to_string(),
            ChannelStatus::Online,
            "alice".to_string(),
            true,
            "Chat connected".to_string(),
            true,
        );
        let text = render_to_text(&mut title_bar);

        assert!(text.contains("Helmsman @ localhost:8083"));
        assert!(text.contains("chat: online"));
        assert!(text.contains("as alice"));
        assert!(text.contains("logged in"));
        assert!(text.contains("Chat connected"));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_skips_empty_segments() {
        let mut title_bar = TitleBar::new(
            "panel:8083".to_string(),
            ChannelStatus::Retrying {
                attempt: 3,
                delay_ms: 2000,
            },
            String::new(),
            false,
            String::new(),
            false,
        );
        let text = render_to_text(&mut title_bar);

        assert!(text.contains("chat: retrying in 2.0s"));
        assert!(!text.contains("as "));
        assert!(!text.contains("logged in"));
        assert!(!text.contains("↓ New"));
        assert_eq!(text.matches('|').count(), 1);
    }
}
