//! Keyboard and tick events for the TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::Result;
use std::time::Duration;

/// Unified event type for the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Poll timed out; ages notices
    Tick,
    Resize(u16, u16),
}

impl Event {
    /// Map a crossterm event. Key releases and mouse input become ticks.
    fn from_crossterm(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
            _ => Event::Tick,
        }
    }
}

/// Polls crossterm with a tick interval.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Wait for the next event, or a tick when the poll times out.
    pub async fn next(&self) -> Result<Event> {
        // Polling blocks, keep it off the runtime threads
        let tick_rate = self.tick_rate;
        tokio::task::spawn_blocking(move || -> Result<Event> {
            if event::poll(tick_rate)? {
                Ok(Event::from_crossterm(event::read()?))
            } else {
                Ok(Event::Tick)
            }
        })
        .await?
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(250)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_tick_rate() {
        assert_eq!(EventHandler::new(100).tick_rate, Duration::from_millis(100));
        assert_eq!(EventHandler::default().tick_rate, Duration::from_millis(250));
        assert_eq!(EventHandler::new(0).tick_rate, Duration::from_millis(1));
    }

    #[test]
    fn test_key_press_maps_to_key() {
        let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(matches!(Event::from_crossterm(CrosstermEvent::Key(key)), Event::Key(_)));
    }

    #[test]
    fn test_key_release_maps_to_tick() {
        let key = KeyEvent {
            code: KeyCode::Char('n'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(matches!(Event::from_crossterm(CrosstermEvent::Key(key)), Event::Tick));
        assert!(matches!(Event::from_crossterm(CrosstermEvent::Resize(80, 24)), Event::Resize(80, 24)));
    }
}
