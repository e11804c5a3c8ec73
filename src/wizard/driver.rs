//! Wizard driver: runs the state machine against a progress tracker.

use std::sync::Arc;

use log::{debug, warn};

use super::machine::{Effect, WizardAction, WizardState, reduce};
use crate::error::Result;
use crate::notice::Notice;
use crate::progress::ProgressTracker;
use crate::tools::{Tool, ToolRegistry};

/// Single-tool-at-a-time setup wizard
#[derive(Debug, Clone)]
pub struct Wizard {
    registry: Arc<ToolRegistry>,
    state: WizardState,
}

impl Wizard {
    /// Resume at the tracker's last position. `None` when the registry is empty.
    pub fn resume(registry: Arc<ToolRegistry>, tracker: &ProgressTracker) -> Option<Self> {
        let state = WizardState::new(registry.len(), tracker.last_index())?;
        Some(Self { registry, state })
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    /// Tool currently shown
    pub fn current(&self) -> &Tool {
        // WizardState guarantees index < len
        &self.registry.tools()[self.state.index()]
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Apply an action. Effects are written through the tracker in order.
    ///
    /// The position only moves once the new index has been persisted. A
    /// storage failure is returned and the position is left where it was.
    /// If a mark was saved before the position write failed, the mark notice
    /// is kept and followed by an error notice for the position.
    pub fn dispatch(&mut self, action: WizardAction, tracker: &mut ProgressTracker) -> Result<Vec<Notice>> {
        let transition = reduce(self.state, action, &self.registry, &tracker.state().configured);
        debug!("Wizard {:?}: {} -> {}", action, self.state.index(), transition.state.index());

        let mut notices = Vec::new();
        let mut marked = false;
        for effect in transition.effects {
            match effect {
                Effect::MarkConfigured(name) => {
                    tracker.mark_configured(&name)?;
                    marked = true;
                    notices.push(Notice::success(format!("{} marked as configured", name)));
                }
                Effect::PersistIndex(index) => {
                    if let Err(e) = tracker.update_last_index(index) {
                        warn!("Failed to save wizard position {}: {}", index, e);
                        if !marked {
                            return Err(e);
                        }
                        notices.push(Notice::error(format!("Wizard position was not saved: {}", e)));
                        return Ok(notices);
                    }
                }
                Effect::Notify(notice) => notices.push(notice),
            }
        }

        self.state = transition.state;
        Ok(notices)
    }

    /// `(configured, total)` for the progress bar
    pub fn progress(&self, tracker: &ProgressTracker) -> (usize, usize) {
        (tracker.configured_count(&self.registry), self.registry.total_count())
    }
}
