use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::App;
use crate::app::logging::log_user_interaction;

/// Trait for event handling
pub trait EventHandlers {
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()>;
    fn on_key_event(&mut self, key: KeyEvent);
}

impl EventHandlers for App {
    /// Reads one pending crossterm event and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if let Event::Key(key) = crossterm::event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.on_key_event(key);
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                log_user_interaction("quit", None);
                self.quit();
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                log_user_interaction("quit", Some("ctrl-c"));
                self.quit();
            }
            (KeyCode::Char('r'), _) => {
                log_user_interaction("reload config", Some(&self.config_path.display().to_string()));
                self.reload_config();
            }
            (KeyCode::Char('f'), _) => {
                log_user_interaction("force refresh", None);
                self.force_refresh();
            }
            _ => {}
        }
    }
}
