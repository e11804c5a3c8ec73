//! Wizard state machine.
//!
//! `reduce` is pure: it takes the current position, the registry and the
//! configured set, and returns the next position plus the effects the driver
//! must carry out. Nothing here touches storage.

use std::collections::BTreeSet;

use crate::notice::Notice;
use crate::tools::ToolRegistry;

/// Position of the wizard within a registry of `len` tools.
///
/// Invariant: `len > 0` and `index < len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    index: usize,
    len: usize,
}

impl WizardState {
    /// Build a state, clamping `index` into range. `None` for an empty registry.
    pub fn new(len: usize, index: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            index: index.min(len - 1),
            len,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    fn at(self, index: usize) -> Self {
        Self {
            index: index.min(self.len - 1),
            len: self.len,
        }
    }
}

/// User actions the wizard understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Next,
    Previous,
    /// Mark the current tool configured, then advance
    MarkAndNext,
    SkipToNextUnconfigured,
    /// Jump to an index, clamped into range
    JumpTo(usize),
}

/// Side effects requested by a transition, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    MarkConfigured(String),
    PersistIndex(usize),
    Notify(Notice),
}

/// Result of one reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: WizardState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn move_to(from: WizardState, to: WizardState, mut effects: Vec<Effect>) -> Self {
        if to.index != from.index {
            effects.push(Effect::PersistIndex(to.index));
        }
        Self { state: to, effects }
    }

    /// Notices carried by this transition
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Notify(n) => Some(n),
            _ => None,
        })
    }
}

/// Compute the next wizard state.
pub fn reduce(
    state: WizardState,
    action: WizardAction,
    registry: &ToolRegistry,
    configured: &BTreeSet<String>,
) -> Transition {
    let is_configured = |i: usize| registry.at(i).is_some_and(|t| configured.contains(&t.name));

    match action {
        WizardAction::Next => Transition::move_to(state, state.at(state.index + 1), Vec::new()),
        WizardAction::Previous => Transition::move_to(state, state.at(state.index.saturating_sub(1)), Vec::new()),
        WizardAction::JumpTo(index) => Transition::move_to(state, state.at(index), Vec::new()),
        WizardAction::MarkAndNext => {
            let mut effects = Vec::new();
            if let Some(tool) = registry.at(state.index) {
                if configured.contains(&tool.name) {
                    effects.push(Effect::Notify(Notice::info(format!("{} is already configured", tool.name))));
                } else {
                    effects.push(Effect::MarkConfigured(tool.name.clone()));
                }
            }
            Transition::move_to(state, state.at(state.index + 1), effects)
        }
        WizardAction::SkipToNextUnconfigured => {
            let forward = (state.index + 1)..state.len;
            let wrapped = 0..state.index;
            match forward.chain(wrapped).find(|&i| !is_configured(i)) {
                Some(index) => Transition::move_to(state, state.at(index), Vec::new()),
                None if !is_configured(state.index) => {
                    let mut t = Transition::stay(state);
                    t.effects.push(Effect::Notify(Notice::info("No other unconfigured tools")));
                    t
                }
                None => {
                    let mut t = Transition::stay(state);
                    t.effects.push(Effect::Notify(Notice::all_configured()));
                    t
                }
            }
        }
    }
}
