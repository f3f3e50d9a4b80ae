use serde::{Deserialize, Serialize};

use crate::gfx::Rgba;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppearanceConfig {
    #[serde(default = "AppearanceConfig::default_title_color")]
    pub title_color: String,
    /// Color status badges by status instead of using `status_color`
    #[serde(default = "AppearanceConfig::default_status_use_color")]
    pub status_use_color: bool,
    #[serde(default = "AppearanceConfig::default_status_color")]
    pub status_color: String,
    /// Prefix badges with MANGA/ANIME when both kinds are shown
    #[serde(default)]
    pub show_media_tag: bool,
    #[serde(default = "AppearanceConfig::default_text_background")]
    pub text_background: bool,
    #[serde(default = "AppearanceConfig::default_background_color")]
    pub background_color: String,
    #[serde(default = "AppearanceConfig::default_background_padding")]
    pub background_padding: f32,
    /// 0.0 (transparent) to 1.0 (opaque)
    #[serde(default = "AppearanceConfig::default_background_opacity")]
    pub background_opacity: f32,
}

impl AppearanceConfig {
    /// Parse a hex color string like "#FF5500" into RGB values
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }

    /// Resolve a color option, falling back to its default and recording a
    /// warning when the value does not parse
    fn resolve(name: &str, value: &str, default: &str, warnings: &mut Vec<String>) -> Rgba {
        if let Some((r, g, b)) = Self::parse_hex(value) {
            return Rgba::rgb(r, g, b);
        }
        warnings.push(format!(
            "Invalid color in [appearance]: {} = \"{}\" (using {})",
            name, value, default
        ));
        Self::parse_hex(default)
            .map(|(r, g, b)| Rgba::rgb(r, g, b))
            .unwrap_or(Rgba::WHITE)
    }

    pub fn title_color(&self, warnings: &mut Vec<String>) -> Rgba {
        Self::resolve(
            "title_color",
            &self.title_color,
            &Self::default_title_color(),
            warnings,
        )
    }

    pub fn status_color(&self, warnings: &mut Vec<String>) -> Rgba {
        Self::resolve(
            "status_color",
            &self.status_color,
            &Self::default_status_color(),
            warnings,
        )
    }

    pub fn background_color(&self, warnings: &mut Vec<String>) -> Rgba {
        Self::resolve(
            "background_color",
            &self.background_color,
            &Self::default_background_color(),
            warnings,
        )
    }

    fn default_title_color() -> String {
        "#FFFFFF".to_string()
    }

    fn default_status_use_color() -> bool {
        true
    }

    fn default_status_color() -> String {
        "#FFFFFF".to_string()
    }

    fn default_text_background() -> bool {
        true
    }

    fn default_background_color() -> String {
        "#000000".to_string()
    }

    fn default_background_padding() -> f32 {
        6.0
    }

    fn default_background_opacity() -> f32 {
        0.8
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            title_color: Self::default_title_color(),
            status_use_color: Self::default_status_use_color(),
            status_color: Self::default_status_color(),
            show_media_tag: false,
            text_background: Self::default_text_background(),
            background_color: Self::default_background_color(),
            background_padding: Self::default_background_padding(),
            background_opacity: Self::default_background_opacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(AppearanceConfig::parse_hex("#4CAF50"), Some((0x4C, 0xAF, 0x50)));
        assert_eq!(AppearanceConfig::parse_hex("ff0000"), Some((0xFF, 0, 0)));
        assert_eq!(AppearanceConfig::parse_hex("#FFF"), None);
        assert_eq!(AppearanceConfig::parse_hex("#GG0000"), None);
        assert_eq!(AppearanceConfig::parse_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn test_invalid_color_falls_back_with_warning() {
        let config = AppearanceConfig {
            title_color: "red".to_string(),
            background_color: "#102030".to_string(),
            ..AppearanceConfig::default()
        };
        let mut warnings = Vec::new();

        assert_eq!(config.title_color(&mut warnings), Rgba::WHITE);
        assert_eq!(config.background_color(&mut warnings), Rgba::rgb(0x10, 0x20, 0x30));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("title_color"));
    }
}
