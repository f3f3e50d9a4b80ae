use std::time::Duration;

use crate::entry::{MediaFilter, StatusFilter};
use crate::gfx::Rgba;

/// Lower bound for the periodic refresh
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
/// Upper bound for the periodic refresh
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Configuration snapshot read by the scroller.
///
/// A new value replaces the old one wholesale on every update; the scroller
/// compares the parts it cares about to decide what to invalidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub username: String,
    pub status_filter: StatusFilter,
    pub media: MediaFilter,
    pub scroll_speed: f32,
    pub item_width: f32,
    pub item_gap: f32,
    pub refresh_interval: Duration,
    pub text_scale: f32,
    pub title_color: Rgba,
    pub use_automatic_status_colors: bool,
    pub status_color: Rgba,
    pub show_media_tag: bool,
    pub enable_text_background: bool,
    pub background_color: Rgba,
    pub background_padding: f32,
    pub background_opacity: f32,
}

/// Everything that changes how title and badge textures look.
/// Two settings with equal styles can share text textures.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub title_color: Rgba,
    pub use_automatic_status_colors: bool,
    pub status_color: Rgba,
    /// Media tag is only shown when both kinds are mixed
    pub media_tag: bool,
    pub text_scale: f32,
    pub text_background: bool,
}

/// What the refresh controller needs to know to build a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchQuery {
    pub username: String,
    pub status: StatusFilter,
    pub media: MediaFilter,
}

impl Settings {
    /// Width of one item including the gap after it
    pub fn item_span(&self) -> f32 {
        self.item_width + self.item_gap
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            title_color: self.title_color,
            use_automatic_status_colors: self.use_automatic_status_colors,
            status_color: self.status_color,
            media_tag: self.show_media_tag && self.media == MediaFilter::Both,
            text_scale: self.text_scale,
            text_background: self.enable_text_background,
        }
    }

    /// `None` when no username is configured; nothing can be fetched then
    pub fn fetch_query(&self) -> Option<FetchQuery> {
        let username = self.username.trim();
        if username.is_empty() {
            return None;
        }
        Some(FetchQuery {
            username: username.to_string(),
            status: self.status_filter,
            media: self.media,
        })
    }

    /// Clamp values into the ranges the scroller can work with
    pub fn validated(mut self) -> Self {
        self.refresh_interval = self
            .refresh_interval
            .clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
        if !self.scroll_speed.is_finite() {
            self.scroll_speed = 0.0;
        }
        self.scroll_speed = self.scroll_speed.clamp(0.0, 1000.0);
        if !self.item_width.is_finite() || self.item_width < 1.0 {
            self.item_width = 1.0;
        }
        if !self.item_gap.is_finite() || self.item_gap < 0.0 {
            self.item_gap = 0.0;
        }
        if !self.text_scale.is_finite() || self.text_scale <= 0.0 {
            self.text_scale = 1.0;
        }
        if !self.background_padding.is_finite() || self.background_padding < 0.0 {
            self.background_padding = 0.0;
        }
        self.background_opacity = if self.background_opacity.is_finite() {
            self.background_opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: String::new(),
            status_filter: StatusFilter::InProgress,
            media: MediaFilter::Manga,
            scroll_speed: 50.0,
            item_width: 250.0,
            item_gap: 30.0,
            refresh_interval: Duration::from_secs(300),
            text_scale: 2.5,
            title_color: Rgba::WHITE,
            use_automatic_status_colors: true,
            status_color: Rgba::WHITE,
            show_media_tag: false,
            enable_text_background: true,
            background_color: Rgba::BLACK,
            background_padding: 6.0,
            background_opacity: 0.8,
        }
    }
}
