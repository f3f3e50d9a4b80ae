use crate::app::config::appearance::AppearanceConfig;
use crate::app::config::layout::LayoutConfig;
use crate::app::config::logging::LoggingConfig;
use crate::app::config::preview::PreviewConfig;
use crate::app::config::source::SourceConfig;
use crate::settings::{MAX_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL, Settings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Known option names per section, used to flag typos
const KNOWN_FIELDS: &[(&str, &[&str])] = &[
    ("source", &["username", "status", "media", "refresh_interval"]),
    (
        "layout",
        &["scroll_speed", "item_width", "item_gap", "text_scale"],
    ),
    (
        "appearance",
        &[
            "title_color",
            "status_use_color",
            "status_color",
            "show_media_tag",
            "text_background",
            "background_color",
            "background_padding",
            "background_opacity",
        ],
    ),
    ("preview", &["fps"]),
    (
        "logging",
        &[
            "enabled",
            "level",
            "log_to_console",
            "append_to_file",
            "rotate_logs",
            "rotation_size_mb",
            "keep_log_files",
            "custom_log_path",
        ],
    ),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Closest candidate within a few edits, if any
fn find_similar<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let unknown_lower = unknown.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| {
            (
                candidate,
                levenshtein_distance(&unknown_lower, &candidate.to_lowercase()),
            )
        })
        .filter(|&(candidate, distance)| {
            // At least 3 edits, or half the longer name
            distance <= (unknown.len().max(candidate.len()) / 2).max(3)
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

fn unknown_section_warning(key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("Unknown config section: [{}] (did you mean: [{}]?)", key, s),
        None => format!("Unknown config section: [{}]", key),
    }
}

fn unknown_option_warning(section: &str, key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!(
            "Unknown option in [{}]: {} (did you mean: {}?)",
            section, key, s
        ),
        None => format!("Unknown option in [{}]: {}", section, key),
    }
}

impl Config {
    /// Returns the default config file path based on the platform:
    /// - Linux: ~/.config/malscroll/config.toml (XDG_CONFIG_HOME)
    /// - macOS: ~/Library/Application Support/malscroll/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\malscroll\config.toml
    pub fn default_config_path() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(config_dir.join("malscroll").join("config.toml"))
    }

    /// Load the config at `config_path` (or the default path), creating it
    /// with defaults when missing. Problems that do not stop loading are
    /// returned as warnings since the logger is not up yet.
    pub fn load(config_path: Option<PathBuf>) -> color_eyre::Result<(Self, Vec<String>)> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let default_config = Config::default();
            std::fs::write(&config_path, toml::to_string_pretty(&default_config)?)?;
            eprintln!("Created default config file at: {}", config_path.display());

            return Ok((default_config, Vec::new()));
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse config text; an unparsable file yields defaults plus a warning
    pub fn parse(contents: &str) -> (Self, Vec<String>) {
        let mut warnings = Self::check_unknown_fields(contents);
        let config = toml::from_str(contents).unwrap_or_else(|e| {
            warnings.push(format!("Failed to parse config file, using defaults: {}", e));
            Config::default()
        });
        (config, warnings)
    }

    /// Check for unknown sections and options and describe each one
    fn check_unknown_fields(contents: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        // Syntax errors are reported by the real parse
        let Ok(table) = toml::from_str::<toml::Table>(contents) else {
            return warnings;
        };

        let sections: Vec<&str> = KNOWN_FIELDS.iter().map(|(name, _)| *name).collect();
        for (key, value) in &table {
            let Some((section, fields)) = KNOWN_FIELDS.iter().find(|(name, _)| *name == key.as_str())
            else {
                let suggestion = find_similar(key, &sections);
                warnings.push(unknown_section_warning(key, suggestion));
                continue;
            };

            if let toml::Value::Table(options) = value {
                for option in options.keys() {
                    if !fields.contains(&option.as_str()) {
                        let suggestion = find_similar(option, fields);
                        warnings.push(unknown_option_warning(section, option, suggestion));
                    }
                }
            }
        }

        warnings
    }

    /// Generate a default config file at the specified path
    pub fn generate_default(path: PathBuf) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Config file already exists at: {}",
                path.display()
            ));
        }

        std::fs::write(&path, toml::to_string_pretty(&Config::default())?)?;

        println!("Generated default config at: {}", path.display());
        Ok(())
    }

    /// Scroller settings for this config, plus warnings for values that had
    /// to be replaced
    pub fn settings(&self) -> (Settings, Vec<String>) {
        let mut warnings = Vec::new();
        let appearance = &self.appearance;

        let refresh_interval = Duration::from_secs(self.source.refresh_interval);
        if !(MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL).contains(&refresh_interval) {
            warnings.push(format!(
                "refresh_interval = {} is outside {}-{} seconds and will be clamped",
                self.source.refresh_interval,
                MIN_REFRESH_INTERVAL.as_secs(),
                MAX_REFRESH_INTERVAL.as_secs()
            ));
        }

        let settings = Settings {
            username: self.source.username.clone(),
            status_filter: self.source.status,
            media: self.source.media,
            scroll_speed: self.layout.scroll_speed,
            item_width: self.layout.item_width,
            item_gap: self.layout.item_gap,
            refresh_interval,
            text_scale: self.layout.text_scale,
            title_color: appearance.title_color(&mut warnings),
            use_automatic_status_colors: appearance.status_use_color,
            status_color: appearance.status_color(&mut warnings),
            show_media_tag: appearance.show_media_tag,
            enable_text_background: appearance.text_background,
            background_color: appearance.background_color(&mut warnings),
            background_padding: appearance.background_padding,
            background_opacity: appearance.background_opacity,
        };

        (settings.validated(), warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{MediaFilter, StatusFilter};
    use crate::gfx::Rgba;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("layout", "layout"), 0);
    }

    #[test]
    fn test_find_similar() {
        let fields = ["scroll_speed", "item_width", "item_gap", "text_scale"];
        assert_eq!(find_similar("item_widht", &fields), Some("item_width"));
        assert_eq!(find_similar("SCROLL_SPEED", &fields), Some("scroll_speed"));
        assert_eq!(find_similar("zzz", &fields), None);
    }

    #[test]
    fn test_unknown_fields_are_reported() {
        let contents = r##"
            [sourse]
            username = "x"

            [layout]
            item_widht = 200

            [appearance]
            title_color = "#FFFFFF"
        "##;

        let warnings = Config::check_unknown_fields(contents);

        assert_eq!(
            warnings,
            vec![
                "Unknown option in [layout]: item_widht (did you mean: item_width?)".to_string(),
                "Unknown config section: [sourse] (did you mean: [source]?)".to_string(),
            ]
        );
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let (config, warnings) = Config::parse(
            r#"
            [source]
            username = "someone"
            status = "WATCHING"
            media = "both"

            [layout]
            scroll_speed = 80.0
        "#,
        );

        assert!(warnings.is_empty());
        assert_eq!(config.source.username, "someone");
        assert_eq!(config.source.status, StatusFilter::InProgress);
        assert_eq!(config.source.media, MediaFilter::Both);
        assert_eq!(config.source.refresh_interval, 300);
        assert_eq!(config.layout.scroll_speed, 80.0);
        assert_eq!(config.layout.item_width, 250.0);
        assert_eq!(config.preview.fps, 30);
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let (config, warnings) = Config::parse("[source\nusername = 1");
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_settings_are_built_and_validated() {
        let mut config = Config::default();
        config.source.username = "someone".to_string();
        config.source.refresh_interval = 5;
        config.layout.scroll_speed = 5000.0;
        config.appearance.background_color = "#202020".to_string();
        config.appearance.status_color = "nope".to_string();

        let (settings, warnings) = config.settings();

        assert_eq!(settings.username, "someone");
        assert_eq!(settings.refresh_interval, Duration::from_secs(60));
        assert_eq!(settings.scroll_speed, 1000.0);
        assert_eq!(settings.background_color, Rgba::rgb(0x20, 0x20, 0x20));
        assert_eq!(settings.status_color, Rgba::WHITE);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_defaults_match_scroller_defaults() {
        let (settings, warnings) = Config::default().settings();
        assert!(warnings.is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("malscroll-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_dir_all(&dir);

        let (config, warnings) = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config, Config::default());
        assert!(warnings.is_empty());
        assert!(path.exists());

        let (reloaded, warnings) = Config::load(Some(path.clone())).unwrap();
        assert_eq!(reloaded, config);
        assert!(warnings.is_empty());

        assert!(Config::generate_default(path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
