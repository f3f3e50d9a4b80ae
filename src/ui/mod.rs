pub mod utils;
pub mod widgets;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    widgets::{Block, BorderType, Borders},
};
use ratatui_image::protocol::StatefulProtocol;

pub use widgets::StatusLine;

/// Terminal-side copy of the last composited frame
#[derive(Default)]
pub struct Preview {
    pub image: Option<StatefulProtocol>,
}

/// Renders the preview and the status line
pub fn render(frame: &mut Frame<'_>, preview: &mut Preview, status: &StatusLine) {
    let [preview_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" malscroll ");
    let inner = block.inner(preview_area);
    frame.render_widget(block, preview_area);

    widgets::render_preview_widget(frame, preview, inner);
    frame.render_widget(
        widgets::create_status_bar(status, status_area.width, Instant::now()),
        status_area,
    );
}
