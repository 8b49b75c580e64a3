use ratatui::Frame;
use ratatui::layout::Rect;

/// A UI component drawn into part of the frame.
///
/// Components receive their data as struct fields ("props") and may hold
/// a `&mut` borrow of persistent state, which is why `render` takes
/// `&mut self`: the chat log updates its layout cache and scroll offset
/// while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
