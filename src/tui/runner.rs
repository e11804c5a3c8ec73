//! TUI Runner - main event loop.
//!
//! Render, wait for an event, apply it, repeat until quit.

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views::render;
use eyre::Result;
use log::info;

/// Owns the terminal, the app and the event handler.
pub struct TuiRunner {
    terminal: Tui,
    app: App,
    event_handler: EventHandler,
}

impl TuiRunner {
    pub fn new(terminal: Tui, app: App, tick_rate_ms: u64) -> Self {
        Self {
            terminal,
            app,
            event_handler: EventHandler::new(tick_rate_ms),
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the main TUI loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop");

        loop {
            self.terminal.draw(|f| render(&self.app, f))?;

            match self.event_handler.next().await? {
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Event::Tick => self.app.tick(),
                // Redrawn on the next pass
                Event::Resize(_, _) => {}
            }

            if self.app.should_quit {
                break;
            }
        }

        let (configured, total) = self.app.progress();
        info!("TUI main loop ended ({}/{} configured)", configured, total);
        Ok(())
    }
}
