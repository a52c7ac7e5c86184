//! Terminal setup and teardown
//!
//! The panel lives in an inline viewport below the cursor, so the rest of
//! the scrollback stays visible. Raw mode is not needed: Ctrl-C arrives as
//! a signal.

use crossterm::{cursor::Show, execute};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use scribe_core::{Result, ScribeError};
use std::io::{self, Stdout};

/// Terminal type for the panel
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Reserve `height` lines below the cursor for the panel
pub fn init(height: u16) -> Result<Tui> {
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .map_err(|e| ScribeError::Terminal(format!("Failed to create terminal: {}", e)))
}

/// Leave the last frame on screen and put the cursor back
pub fn restore(terminal: &mut Tui) -> Result<()> {
    terminal
        .show_cursor()
        .map_err(|e| ScribeError::Terminal(format!("Failed to show cursor: {}", e)))?;
    println!();
    Ok(())
}

/// Shows the cursor again on drop, including during a panic
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
    }
}
