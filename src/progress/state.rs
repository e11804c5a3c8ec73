//! Persisted progress state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tools::ToolRegistry;

/// Which tools the user has confirmed, and where the wizard was left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Names confirmed as set up in the agent platform. May include names
    /// no longer in the registry.
    pub configured: BTreeSet<String>,
    /// Last wizard position
    pub last_index: usize,
}

impl ProgressState {
    /// Apply the load-time rule: an out-of-range position restarts at 0.
    pub fn clamped(mut self, registry_len: usize) -> Self {
        if self.last_index >= registry_len {
            self.last_index = 0;
        }
        self
    }

    /// Configured names that are current registry members
    pub fn configured_count(&self, registry: &ToolRegistry) -> usize {
        self.configured.iter().filter(|name| registry.contains(name)).count()
    }

    /// `configured_count / total`, 0.0 for an empty registry
    pub fn fraction(&self, registry: &ToolRegistry) -> f64 {
        let total = registry.total_count();
        if total == 0 {
            return 0.0;
        }
        self.configured_count(registry) as f64 / total as f64
    }

    /// Configured names with no matching registry tool
    pub fn stale_entries<'a>(&'a self, registry: &ToolRegistry) -> Vec<&'a str> {
        self.configured
            .iter()
            .filter(|name| !registry.contains(name))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;

    fn registry(names: &[&str]) -> ToolRegistry {
        ToolRegistry::new(names.iter().map(|n| Tool::new(*n, "test")).collect()).unwrap()
    }

    fn state(configured: &[&str], last_index: usize) -> ProgressState {
        ProgressState {
            configured: configured.iter().map(|s| s.to_string()).collect(),
            last_index,
        }
    }

    #[test]
    fn test_clamped_out_of_range() {
        assert_eq!(state(&[], 5).clamped(3).last_index, 0);
        assert_eq!(state(&[], 2).clamped(3).last_index, 2);
        assert_eq!(state(&[], 0).clamped(0).last_index, 0);
    }

    #[test]
    fn test_fraction_excludes_stale() {
        let registry = registry(&["a", "b", "c", "d"]);
        let progress = state(&["a", "b", "removed"], 0);
        assert_eq!(progress.configured_count(&registry), 2);
        assert!((progress.fraction(&registry) - 0.5).abs() < f64::EPSILON);
        assert_eq!(progress.stale_entries(&registry), vec!["removed"]);
    }

    #[test]
    fn test_fraction_empty_registry_is_zero() {
        let registry = registry(&[]);
        let progress = state(&["a"], 0);
        let fraction = progress.fraction(&registry);
        assert_eq!(fraction, 0.0);
        assert!(!fraction.is_nan());
    }

    #[test]
    fn test_fraction_bounds() {
        let registry = registry(&["a", "b"]);
        assert_eq!(state(&[], 0).fraction(&registry), 0.0);
        assert_eq!(state(&["a", "b"], 0).fraction(&registry), 1.0);
    }
}
