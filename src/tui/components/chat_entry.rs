use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::channel::ChannelMessage;

/// One chat log line: `"<msgdate> <author>: <message>"`, wrapped to width.
///
/// Transient: built per frame for each visible entry. The body is drawn as
/// plain text, never interpreted.
#[derive(Clone, Copy)]
pub struct ChatEntry<'a> {
    pub message: &'a ChannelMessage,
}

impl<'a> ChatEntry<'a> {
    pub fn new(message: &'a ChannelMessage) -> Self {
        Self { message }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        let line = Line::from(vec![
            Span::styled(
                self.message.msgdate.as_str(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(" "),
            Span::styled(
                format!("{}:", self.message.author),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(self.message.message.as_str()),
        ]);
        Paragraph::new(line).wrap(Wrap { trim: false })
    }

    /// Rows this entry takes at the given width. Always at least 1.
    pub fn calculate_height(message: &ChannelMessage, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let lines = ChatEntry::new(message).paragraph().line_count(width);
        (lines as u16).max(1)
    }
}

impl<'a> Widget for ChatEntry<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.paragraph().render(area, buf);
    }
}
