//! Cursor position and horizontal scrolling for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the first visible display
//! column. All methods take `buffer: &str` explicitly; the text is owned by
//! `InputBox`.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (1 each side) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First display column shown (0 when the text fits)
    pub scroll_col: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_col: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_col = 0;
    }

    /// Display column of the cursor within the whole buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Shift the horizontal scroll so the cursor stays inside `inner_width`.
    pub fn update_scroll(&mut self, buffer: &str, inner_width: u16) {
        let width = inner_width as usize;
        if width == 0 {
            self.scroll_col = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + width {
            // Keep one cell for the cursor itself past the last character
            self.scroll_col = col + 1 - width;
        }
    }

    /// The slice of `buffer` visible at the current scroll.
    pub fn visible<'a>(&self, buffer: &'a str, inner_width: u16) -> &'a str {
        let width = inner_width as usize;
        let mut col = 0;
        let mut start = buffer.len();
        let mut end = buffer.len();

        for (i, c) in buffer.char_indices() {
            if col >= self.scroll_col && start == buffer.len() {
                start = i;
            }
            let w = c.width().unwrap_or(0);
            if col + w > self.scroll_col + width {
                end = i;
                break;
            }
            col += w;
        }
        if start > end {
            return "";
        }
        &buffer[start..end]
    }

    /// Screen position of the terminal cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let col = self.column(buffer).saturating_sub(self.scroll_col) as u16;
        let max_x = area.x + area.width.saturating_sub(BORDER_OFFSET + 1);
        ((area.x + BORDER_OFFSET + col).min(max_x), area.y + BORDER_OFFSET)
    }
}

/// Byte offset of the character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
