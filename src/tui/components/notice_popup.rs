//! # NoticePopup Component
//!
//! Modal box for the notice at the front of the queue. Enter or Esc
//! dismisses it and the next one (if any) takes its place.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::notice::{Notice, NoticeKind};
use crate::tui::component::Component;
use crate::tui::components::centered_rect;

/// Borders (2) + vertical padding (0) around the text
const VERTICAL_OVERHEAD: u16 = 2;
const HORIZONTAL_OVERHEAD: u16 = 4;

pub struct NoticePopup<'a> {
    pub notice: &'a Notice,
    /// Notices queued behind this one
    pub queued: usize,
}

impl<'a> NoticePopup<'a> {
    pub fn new(notice: &'a Notice, queued: usize) -> Self {
        Self { notice, queued }
    }

    fn color(&self) -> Color {
        match self.notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
            NoticeKind::Alert => Color::Yellow,
            NoticeKind::Info => Color::Cyan,
        }
    }
}

impl<'a> Component for NoticePopup<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = (area.width * 6 / 10).max(30).min(area.width);
        let text = Paragraph::new(self.notice.text.as_str()).wrap(Wrap { trim: false });
        let text_rows = text.line_count(width.saturating_sub(HORIZONTAL_OVERHEAD)) as u16;
        let height = (text_rows + VERTICAL_OVERHEAD).min(area.height);
        let popup = centered_rect(width, height, area);

        frame.render_widget(Clear, popup);

        let hint = if self.queued > 0 {
            format!(" Enter Dismiss ({} more) ", self.queued)
        } else {
            " Enter Dismiss ".to_string()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color()))
            .title(format!(" {} ", self.notice.kind.title()))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(hint).centered())
            .padding(Padding::horizontal(1));

        frame.render_widget(text.block(block), popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(notice: &Notice, queued: usize) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| NoticePopup::new(notice, queued).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_error_notice_shows_title_and_text() {
        let text = render(&Notice::error("player not found"), 0);
        assert!(text.contains("Error"));
        assert!(text.contains("player not found"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_queued_count_in_hint() {
        let text = render(&Notice::success("Action has been canceled."), 2);
        assert!(text.contains("Success"));
        assert!(text.contains("(2 more)"));
    }
}
