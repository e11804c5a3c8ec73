//! View and list state for the TUI.
//!
//! - `View`: which screen is active
//! - `InteractionMode`: normal keys, search typing or help overlay
//! - `ListState`: selection, expansion and filters of the tool list

use std::collections::BTreeSet;

use crate::tools::{Tool, ToolRegistry};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// One tool at a time with progress
    #[default]
    Wizard,
    /// Searchable list of tool cards
    Tools,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Wizard => View::Tools,
            View::Tools => View::Wizard,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Wizard => "Wizard",
            View::Tools => "Tools",
        }
    }
}

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    /// Typing into the search box
    Search,
    Help,
}

/// Selection and filters of the tool list
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Index into the visible (filtered) tools
    pub selected: usize,
    /// Names of expanded cards
    pub expanded: BTreeSet<String>,
    pub query: String,
    pub category: Option<String>,
}

impl ListState {
    /// Tools after applying the search query and category filter, in registry order.
    pub fn visible<'r>(&self, registry: &'r ToolRegistry) -> Vec<&'r Tool> {
        registry
            .search(&self.query)
            .into_iter()
            .filter(|t| match &self.category {
                Some(category) => t.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .collect()
    }

    /// Currently selected visible tool
    pub fn selected_tool<'r>(&self, registry: &'r ToolRegistry) -> Option<&'r Tool> {
        self.visible(registry).get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, visible_len: usize) {
        if self.selected + 1 < visible_len {
            self.selected += 1;
        }
    }

    /// Keep the selection inside the visible list after a filter change
    pub fn clamp(&mut self, visible_len: usize) {
        if self.selected >= visible_len {
            self.selected = visible_len.saturating_sub(1);
        }
    }

    /// Expand or collapse a card. Returns the new expanded flag.
    pub fn toggle_expanded(&mut self, name: &str) -> bool {
        if self.expanded.remove(name) {
            false
        } else {
            self.expanded.insert(name.to_string());
            true
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Step through "all categories" followed by each category in order
    pub fn cycle_category(&mut self, categories: &[&str]) {
        self.category = match &self.category {
            None => categories.first().map(|c| c.to_string()),
            Some(current) => categories
                .iter()
                .position(|c| *c == current.as_str())
                .and_then(|i| categories.get(i + 1))
                .map(|c| c.to_string()),
        };
        self.selected = 0;
    }
}
