//! Configuration progress tracker.
//!
//! Owns the configured set and last wizard position, writing each change
//! through to the settings store as it happens.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};

use super::state::ProgressState;
use crate::error::Result;
use crate::settings::{SettingsStore, get_typed, keys, set_typed};
use crate::tools::ToolRegistry;

/// Progress tracker backed by a settings store
pub struct ProgressTracker {
    store: Arc<dyn SettingsStore>,
    state: ProgressState,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker").field("state", &self.state).finish_non_exhaustive()
    }
}

impl ProgressTracker {
    /// Restore persisted progress for the given registry.
    ///
    /// An out-of-range position is reset to 0. Configured names that are not
    /// in the registry are kept.
    pub fn load(store: Arc<dyn SettingsStore>, registry: &ToolRegistry) -> Result<Self> {
        let configured: BTreeSet<String> = get_typed(store.as_ref(), keys::CONFIGURED_TOOLS)?.unwrap_or_default();
        let last_index: usize = get_typed(store.as_ref(), keys::LAST_TOOL_INDEX)?.unwrap_or(0);

        let state = ProgressState { configured, last_index };
        let clamped = state.clone().clamped(registry.len());
        if clamped.last_index != state.last_index {
            warn!(
                "Saved wizard position {} is outside the registry ({} tools), restarting at 0",
                state.last_index,
                registry.len()
            );
        }

        let stale = clamped.stale_entries(registry);
        if !stale.is_empty() {
            debug!("{} configured tool(s) not in registry: {:?}", stale.len(), stale);
        }

        Ok(Self { store, state: clamped })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn is_configured(&self, name: &str) -> bool {
        self.state.configured.contains(name)
    }

    /// Record a tool as configured. Returns `true` if it was newly added.
    ///
    /// Names outside the registry are still recorded.
    pub fn mark_configured(&mut self, name: &str) -> Result<bool> {
        if self.is_configured(name) {
            return Ok(false);
        }
        let mut next = self.state.configured.clone();
        next.insert(name.to_string());
        self.commit_configured(next)?;
        info!("Marked tool configured: {}", name);
        Ok(true)
    }

    /// Flip a tool's configured flag. Returns the new flag.
    pub fn toggle_configured(&mut self, name: &str) -> Result<bool> {
        let mut next = self.state.configured.clone();
        let now_configured = if next.remove(name) {
            false
        } else {
            next.insert(name.to_string());
            true
        };
        self.commit_configured(next)?;
        info!("Toggled tool {} -> configured={}", name, now_configured);
        Ok(now_configured)
    }

    /// Persist the wizard position.
    pub fn update_last_index(&mut self, index: usize) -> Result<()> {
        set_typed(self.store.as_ref(), keys::LAST_TOOL_INDEX, &index)?;
        self.state.last_index = index;
        Ok(())
    }

    pub fn last_index(&self) -> usize {
        self.state.last_index
    }

    pub fn configured_count(&self, registry: &ToolRegistry) -> usize {
        self.state.configured_count(registry)
    }

    /// Share of registry tools configured, in `[0, 1]`
    pub fn progress_fraction(&self, registry: &ToolRegistry) -> f64 {
        self.state.fraction(registry)
    }

    pub fn stale_entries(&self, registry: &ToolRegistry) -> Vec<String> {
        self.state.stale_entries(registry).into_iter().map(str::to_string).collect()
    }

    /// Drop configured names that are no longer in the registry.
    /// Returns how many were removed.
    pub fn prune_stale(&mut self, registry: &ToolRegistry) -> Result<usize> {
        let next: BTreeSet<String> = self
            .state
            .configured
            .iter()
            .filter(|name| registry.contains(name))
            .cloned()
            .collect();
        let removed = self.state.configured.len() - next.len();
        if removed > 0 {
            self.commit_configured(next)?;
            info!("Pruned {} stale configured tool(s)", removed);
        }
        Ok(removed)
    }

    /// Forget all progress.
    pub fn reset(&mut self) -> Result<()> {
        self.commit_configured(BTreeSet::new())?;
        self.update_last_index(0)?;
        info!("Reset voice tool progress");
        Ok(())
    }

    /// Write first; the in-memory set only changes if the write succeeded.
    fn commit_configured(&mut self, next: BTreeSet<String>) -> Result<()> {
        set_typed(self.store.as_ref(), keys::CONFIGURED_TOOLS, &next)?;
        self.state.configured = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{JsonlSettingsStore, MemorySettingsStore};
    use crate::tools::Tool;
    use serde_json::json;

    fn registry(names: &[&str]) -> ToolRegistry {
        ToolRegistry::new(names.iter().map(|n| Tool::new(*n, "test")).collect()).unwrap()
    }

    fn tracker(store: &Arc<MemorySettingsStore>, registry: &ToolRegistry) -> ProgressTracker {
        ProgressTracker::load(store.clone(), registry).unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b"]);
        let t = tracker(&store, &reg);
        assert_eq!(t.last_index(), 0);
        assert_eq!(t.configured_count(&reg), 0);
    }

    #[test]
    fn test_mark_configured_idempotent() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b"]);
        let mut t = tracker(&store, &reg);

        assert!(t.mark_configured("a").unwrap());
        let once = t.state().clone();
        assert!(!t.mark_configured("a").unwrap());
        assert_eq!(t.state(), &once);
        assert!(t.is_configured("a"));
    }

    #[test]
    fn test_mark_unknown_recorded_but_not_counted() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b"]);
        let mut t = tracker(&store, &reg);

        assert!(t.mark_configured("ghost").unwrap());
        assert!(t.is_configured("ghost"));
        assert_eq!(t.progress_fraction(&reg), 0.0);
        assert_eq!(t.stale_entries(&reg), vec!["ghost".to_string()]);
    }

    #[test]
    fn test_toggle() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a"]);
        let mut t = tracker(&store, &reg);

        assert!(t.toggle_configured("a").unwrap());
        assert!(t.is_configured("a"));
        assert!(!t.toggle_configured("a").unwrap());
        assert!(!t.is_configured("a"));
    }

    #[test]
    fn test_state_survives_reload() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b", "c"]);
        {
            let mut t = tracker(&store, &reg);
            t.mark_configured("b").unwrap();
            t.update_last_index(2).unwrap();
        }
        let t = tracker(&store, &reg);
        assert!(t.is_configured("b"));
        assert_eq!(t.last_index(), 2);
        assert!((t.progress_fraction(&reg) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_clamps_out_of_range_index() {
        let store = Arc::new(MemorySettingsStore::new());
        store.set_setting(keys::LAST_TOOL_INDEX, json!(10)).unwrap();
        let reg = registry(&["a", "b"]);
        assert_eq!(tracker(&store, &reg).last_index(), 0);
    }

    #[test]
    fn test_load_retains_unknown_names() {
        let store = Arc::new(MemorySettingsStore::new());
        store.set_setting(keys::CONFIGURED_TOOLS, json!(["a", "retired_tool"])).unwrap();
        let reg = registry(&["a", "b"]);
        let t = tracker(&store, &reg);
        assert!(t.is_configured("retired_tool"));
        assert_eq!(t.configured_count(&reg), 1);
        assert!((t.progress_fraction(&reg) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b"]);
        let mut t = tracker(&store, &reg);
        t.update_last_index(1).unwrap();

        store.set_fail_writes(true);
        assert!(t.mark_configured("a").is_err());
        assert!(!t.is_configured("a"));
        assert!(t.update_last_index(0).is_err());
        assert_eq!(t.last_index(), 1);
    }

    #[test]
    fn test_blocked_compaction_keeps_tracker_and_file_in_step() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("settings.jsonl.tmp")).unwrap();
        let reg = registry(&["a", "b"]);
        let store: Arc<dyn SettingsStore> = Arc::new(JsonlSettingsStore::open(temp.path()).unwrap());
        let mut t = ProgressTracker::load(store, &reg).unwrap();

        for i in 0..64 {
            t.update_last_index(i % 2).unwrap();
        }
        assert_eq!(t.last_index(), 1);

        let reopened: Arc<dyn SettingsStore> = Arc::new(JsonlSettingsStore::open(temp.path()).unwrap());
        assert_eq!(ProgressTracker::load(reopened, &reg).unwrap().last_index(), 1);
    }

    #[test]
    fn test_prune_stale() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a"]);
        let mut t = tracker(&store, &reg);
        t.mark_configured("a").unwrap();
        t.mark_configured("old").unwrap();

        assert_eq!(t.prune_stale(&reg).unwrap(), 1);
        assert!(!t.is_configured("old"));
        assert!(t.is_configured("a"));
        assert_eq!(t.prune_stale(&reg).unwrap(), 0);
    }

    #[test]
    fn test_reset() {
        let store = Arc::new(MemorySettingsStore::new());
        let reg = registry(&["a", "b"]);
        let mut t = tracker(&store, &reg);
        t.mark_configured("a").unwrap();
        t.update_last_index(1).unwrap();

        t.reset().unwrap();
        let reloaded = tracker(&store, &reg);
        assert_eq!(reloaded.last_index(), 0);
        assert_eq!(reloaded.configured_count(&reg), 0);
    }
}
