//! Terminal setup and the UI-local state that never reaches the core.

pub mod constants;
pub mod layout;
pub mod render;

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switches to the alternate screen in raw mode with bracketed paste.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
    Ok(())
}

/// Highlighted row of the preview list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub cursor: usize,
}

impl UiState {
    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Keeps the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::UiState;

    #[test]
    fn cursor_stays_inside_the_list() {
        let mut ui = UiState::default();
        ui.move_cursor(-1, 3);
        assert_eq!(ui.cursor, 0);
        ui.move_cursor(1, 3);
        ui.move_cursor(1, 3);
        ui.move_cursor(1, 3);
        assert_eq!(ui.cursor, 2);
        ui.clamp(1);
        assert_eq!(ui.cursor, 0);
        ui.move_cursor(1, 0);
        assert_eq!(ui.cursor, 0);
    }
}
