use std::path::PathBuf;
use std::sync::Arc;

use crate::app::config::Config;
use crate::scroller::Scroller;
use crate::source::MalListSource;
use crate::text::BitmapFont;
use crate::ui::StatusLine;

// Module declarations
pub mod cli;
pub mod config;
pub mod event_handlers;
pub mod logging;
pub mod main_loop;
pub mod snapshot;
pub mod terminal;

/// Size of the composited strip, matching a 1080p overlay band
pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 600;

/// Host state: the loaded config and the scroller it drives
pub struct App {
    pub running: bool,
    pub config: Config,
    pub config_path: PathBuf,
    pub config_warnings: Vec<String>,
    /// `--username` survives config reloads
    pub username_override: Option<String>,
    pub scroller: Scroller,
}

impl App {
    pub fn new(
        mut config: Config,
        config_path: PathBuf,
        username_override: Option<String>,
        mut config_warnings: Vec<String>,
    ) -> Self {
        if let Some(username) = &username_override {
            config.source.username = username.clone();
        }
        let (settings, warnings) = config.settings();
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        config_warnings.extend(warnings);

        log::info!(
            "Showing {} list for '{}' ({}), refresh every {}s",
            config.source.media,
            config.source.username,
            config.source.status,
            settings.refresh_interval.as_secs()
        );

        let scroller = Scroller::new(
            Arc::new(MalListSource::new()),
            Box::new(BitmapFont),
            settings,
        );

        Self {
            running: false,
            config,
            config_path,
            config_warnings,
            username_override,
            scroller,
        }
    }

    /// Re-read the config file and push the result into the scroller.
    /// A file that cannot be read keeps the current settings.
    pub fn reload_config(&mut self) {
        let (mut config, mut warnings) = match Config::load(Some(self.config_path.clone())) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!(
                    "Failed to reload config from {}: {}",
                    self.config_path.display(),
                    e
                );
                return;
            }
        };
        if let Some(username) = &self.username_override {
            config.source.username = username.clone();
        }

        let (settings, setting_warnings) = config.settings();
        warnings.extend(setting_warnings);
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        log::info!("Reloaded config from {}", self.config_path.display());
        self.scroller.update_settings(settings);
        self.config = config;
        self.config_warnings = warnings;
    }

    pub fn force_refresh(&mut self) {
        if !self.scroller.request_refresh() {
            log::info!("Refresh not started (already fetching or no username)");
        }
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine {
            username: self.config.source.username.trim().to_string(),
            filter: format!("{}/{}", self.config.source.status, self.config.source.media),
            status: self.scroller.status(),
            warnings: self.config_warnings.len(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
