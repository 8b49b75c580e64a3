use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ChatLog, ConfirmDialog, INPUT_HEIGHT, NoticePopup, TitleBar,
};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    ChatLog::new(&mut tui.chat_log, &app.log).render(frame, main_area);

    // After the log so the unseen marker reflects this frame's scroll
    TitleBar::new(
        app.server_label.clone(),
        app.channel,
        app.author.clone(),
        app.logged_in,
        app.status_message.clone(),
        tui.chat_log.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.author = app.author.clone();
    tui.input_box.dimmed = app.confirmation.is_some() || app.current_notice().is_some();
    tui.input_box.render(frame, input_area);

    // Overlays: notice above the prompt, matching key routing
    if let (Some(pending), Some(dialog)) = (&app.confirmation, &tui.confirm) {
        ConfirmDialog::new(dialog, &pending.prompt).render(frame, frame.area());
    }
    if let Some(notice) = app.current_notice() {
        NoticePopup::new(notice, app.notices.len().saturating_sub(1)).render(frame, frame.area());
    }
}
