use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Pixels per second
    #[serde(default = "LayoutConfig::default_scroll_speed")]
    pub scroll_speed: f32,
    /// Width of one cover, in pixels
    #[serde(default = "LayoutConfig::default_item_width")]
    pub item_width: f32,
    /// Space between covers, in pixels
    #[serde(default = "LayoutConfig::default_item_gap")]
    pub item_gap: f32,
    /// Preferred text magnification; shrunk to fit the item width
    #[serde(default = "LayoutConfig::default_text_scale")]
    pub text_scale: f32,
}

impl LayoutConfig {
    fn default_scroll_speed() -> f32 {
        50.0
    }

    fn default_item_width() -> f32 {
        250.0
    }

    fn default_item_gap() -> f32 {
        30.0
    }

    fn default_text_scale() -> f32 {
        2.5
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scroll_speed: Self::default_scroll_speed(),
            item_width: Self::default_item_width(),
            item_gap: Self::default_item_gap(),
            text_scale: Self::default_text_scale(),
        }
    }
}
