//! # ChatLog Component
//!
//! Scrollable view of the chat log.
//!
//! `ChatLog` is a transient component (created each frame) that wraps
//! `&'a mut ChatLogState` (persistent state) and the log itself (props).
//! The log only ever grows at the end, so entry heights are cached and only
//! new entries are measured, unless the width changes.
//!
//! The log has no size limit, so row positions are `u32`. The `ScrollView`
//! canvas only covers the entries around the viewport, and the scrollbar is
//! drawn separately against the full content height.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::channel::ChannelMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::chat_entry::ChatEntry;
use crate::tui::event::TuiEvent;

/// Scroll and layout state for the chat log.
/// Must be persisted in the parent TuiState.
pub struct ChatLogState {
    /// Offset into the rendered window, rebuilt every frame
    pub scroll_state: ScrollViewState,
    /// First content row shown at the top of the viewport
    pub offset: u32,
    pub layout: LayoutCache,
    /// When true, the view follows the newest line
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for ChatLogState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLogState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            offset: 0,
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u32 {
        self.layout
            .total_height()
            .saturating_sub(u32::from(self.viewport_height))
    }

    /// Pin the view to the newest line. Takes effect on the next render.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
    }

    /// True when there are lines below the visible area.
    pub fn has_unseen_content(&self) -> bool {
        self.offset < self.max_offset()
    }

    fn scroll_up_by(&mut self, rows: u32) {
        self.offset = self.offset.min(self.max_offset()).saturating_sub(rows);
        self.stick_to_bottom = false;
    }

    fn scroll_down_by(&mut self, rows: u32) {
        self.offset = self.offset.saturating_add(rows);
        self.settle();
    }

    /// Clamp the offset into the content and re-pin when the bottom is reached.
    fn settle(&mut self) {
        let max_y = self.max_offset();
        if self.offset >= max_y {
            self.offset = max_y;
            self.stick_to_bottom = true;
        }
    }
}

impl EventHandler for ChatLogState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = u32::from(self.viewport_height.max(1));
        match event {
            TuiEvent::ScrollUp => self.scroll_up_by(1),
            TuiEvent::ScrollDown => self.scroll_down_by(1),
            TuiEvent::ScrollPageUp => self.scroll_up_by(page),
            TuiEvent::ScrollPageDown => self.scroll_down_by(page),
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Scrollable chat log view.
/// Created fresh each frame with references to state and data.
pub struct ChatLog<'a> {
    pub state: &'a mut ChatLogState,
    pub log: &'a [ChannelMessage],
}

impl<'a> ChatLog<'a> {
    pub fn new(state: &'a mut ChatLogState, log: &'a [ChannelMessage]) -> Self {
        Self { state, log }
    }
}

impl<'a> Component for ChatLog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        self.state.layout.measure(self.log, content_width);
        self.state.viewport_height = area.height;

        // Resolve the offset before picking what to draw
        let max_y = self.state.max_offset();
        if self.state.stick_to_bottom || self.state.offset > max_y {
            self.state.offset = max_y;
        }
        let offset = self.state.offset;

        let visible = self.state.layout.visible_range(offset, area.height);
        let window_top = self.state.layout.top_of(visible.start);
        let window_height = self
            .state
            .layout
            .top_of(visible.end)
            .saturating_sub(window_top);

        let mut scroll_view = ScrollView::new(Size::new(content_width, clamp_rows(window_height)))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let Ok(y) = u16::try_from(self.state.layout.top_of(i).saturating_sub(window_top)) else {
                break;
            };
            let entry_rect = Rect::new(0, y, content_width, self.state.layout.heights[i]);
            scroll_view.render_widget(ChatEntry::new(&self.log[i]), entry_rect);
        }

        self.state.scroll_state.set_offset(Position {
            x: 0,
            y: clamp_rows(offset.saturating_sub(window_top)),
        });
        let content_area = Rect {
            width: content_width,
            ..area
        };
        frame.render_stateful_widget(scroll_view, content_area, &mut self.state.scroll_state);

        let mut scrollbar_state = ScrollbarState::new(max_y as usize)
            .position(offset as usize)
            .viewport_content_length(area.height as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn clamp_rows(rows: u32) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Cached per-entry heights for one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u32>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Bring the cache up to date with `log`, measuring only what's new.
    pub fn measure(&mut self, log: &[ChannelMessage], content_width: u16) {
        if content_width != self.content_width || log.len() < self.heights.len() {
            self.heights.clear();
            self.prefix_heights.clear();
            self.content_width = content_width;
        }

        let mut total = self.total_height();
        for message in &log[self.heights.len()..] {
            let height = ChatEntry::calculate_height(message, content_width);
            total = total.saturating_add(u32::from(height));
            self.heights.push(height);
            self.prefix_heights.push(total);
        }
    }

    pub fn total_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Content row where entry `index` starts. `index == len` gives the total.
    pub fn top_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_heights.get(index - 1).copied().unwrap_or(0)
        }
    }

    /// Entries overlapping the viewport, plus half a screen either side.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let viewport_height = u32::from(viewport_height);
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn log_of(n: usize) -> Vec<ChannelMessage> {
        (0..n)
            .map(|i| ChannelMessage {
                msgdate: "[10:00:00]".to_string(),
                author: "bob".to_string(),
                message: format!("line {i}"),
            })
            .collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_measures_only_new_entries() {
        let mut cache = LayoutCache::new();
        let log = log_of(3);
        cache.measure(&log, 80);
        assert_eq!(cache.heights, vec![1, 1, 1]);
        assert_eq!(cache.prefix_heights, vec![1, 2, 3]);

        let log = log_of(5);
        cache.measure(&log, 80);
        assert_eq!(cache.total_height(), 5);
        assert_eq!(cache.top_of(4), 4);
    }

    #[test]
    fn test_layout_cache_resets_on_width_change() {
        let mut cache = LayoutCache::new();
        let mut log = log_of(1);
        log[0].message = "word ".repeat(20);
        cache.measure(&log, 200);
        assert_eq!(cache.heights, vec![1]);
        cache.measure(&log, 20);
        assert!(cache.heights[0] > 1);
    }

    #[test]
    fn test_visible_range_empty() {
        let cache = LayoutCache::new();
        assert_eq!(cache.visible_range(0, 10), 0..0);
    }

    #[test]
    fn test_render_sticks_to_bottom() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ChatLogState::new();
        let log = log_of(20);

        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("line 19"));
        assert!(!text.contains("line 0 "));
        assert!(!state.has_unseen_content());
    }

    #[test]
    fn test_scroll_up_unpins_and_new_message_repins() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ChatLogState::new();
        let mut log = log_of(20);

        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();

        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);
        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();
        assert!(state.has_unseen_content());

        log.extend(log_of(1).into_iter().map(|mut m| {
            m.message = "fresh".to_string();
            m
        }));
        state.scroll_to_bottom();
        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();
        assert!(screen_text(&terminal).contains("fresh"));
        assert!(!state.has_unseen_content());
    }

    #[test]
    fn test_render_log_taller_than_u16_rows() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ChatLogState::new();
        let log = log_of(65_540);

        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();

        assert_eq!(state.layout.total_height(), 65_540);
        assert_eq!(state.offset, 65_535);
        assert!(screen_text(&terminal).contains("line 65539"));
        assert!(!state.has_unseen_content());

        // Scrolling back stays anchored past the u16 range
        state.handle_event(&TuiEvent::ScrollPageUp);
        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();
        assert_eq!(state.offset, 65_530);
        let text = screen_text(&terminal);
        assert!(text.contains("line 65530"));
        assert!(!text.contains("line 65539"));
        assert!(state.has_unseen_content());
    }

    #[test]
    fn test_scroll_down_to_end_repins() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = ChatLogState::new();
        let log = log_of(8);

        terminal
            .draw(|f| ChatLog::new(&mut state, &log).render(f, f.area()))
            .unwrap();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }
}
