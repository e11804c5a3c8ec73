//! Terminal User Interface for ELEC-MATE voice tool setup.
//!
//! Two views share one progress tracker:
//! - **Wizard**: one tool at a time with mark, skip and copy actions
//! - **Tools**: searchable list of tool cards with a configured toggle

mod app;
mod events;
mod runner;
mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{InteractionMode, ListState, View};

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enable raw mode and switch to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

/// Leave the alternate screen and disable raw mode.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

pub mod colors {
    use ratatui::style::Color;

    pub const CONFIGURED: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const PENDING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const FAILED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255);
    pub const SELECTED: Color = Color::DarkGray;
    pub const DIM: Color = Color::DarkGray;
}
