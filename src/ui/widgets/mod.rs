pub mod preview;
pub mod status_bar;

pub use self::preview::render_preview_widget;
pub use self::status_bar::{StatusLine, create_status_bar};
