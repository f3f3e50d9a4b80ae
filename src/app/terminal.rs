use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::DefaultTerminal;

/// Switch to the alternate screen in raw mode
pub fn init_terminal() -> color_eyre::Result<DefaultTerminal> {
    execute!(std::io::stdout(), EnterAlternateScreen, cursor::Hide)?;
    enable_raw_mode()?;

    let terminal =
        ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(std::io::stdout()))?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> color_eyre::Result<()> {
    execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    disable_raw_mode()?;
    Ok(())
}

/// Restores the terminal on drop, so an error or panic inside the preview
/// loop does not leave the shell in raw mode
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}
