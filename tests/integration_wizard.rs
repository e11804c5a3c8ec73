//! Wizard and progress integration tests
//!
//! Exercise the embedded registry with a file-backed settings store the way
//! the CLI and TUI use them.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use elecmate::error::Result;
use elecmate::export::{ExportFormat, Exporter, TypeLabels};
use elecmate::notice::Notice;
use elecmate::progress::ProgressTracker;
use elecmate::settings::{JsonlSettingsStore, SettingsStore, VoiceAgentSettings, keys};
use elecmate::tools::{Tool, ToolRegistry};
use elecmate::wizard::{Wizard, WizardAction};
use serde_json::json;
use tempfile::TempDir;

fn open_store(dir: &TempDir, profile: &str) -> Result<Arc<dyn SettingsStore>> {
    Ok(Arc::new(JsonlSettingsStore::open_profile(dir.path(), profile)?))
}

/// Progress survives a restart and the wizard resumes where it stopped
#[test]
fn test_wizard_resumes_after_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Arc::new(ToolRegistry::embedded()?);

    {
        let store = open_store(&temp_dir, "default")?;
        let mut tracker = ProgressTracker::load(store, &registry)?;
        let mut wizard = Wizard::resume(registry.clone(), &tracker).expect("registry is not empty");
        wizard.dispatch(WizardAction::MarkAndNext, &mut tracker)?;
        wizard.dispatch(WizardAction::MarkAndNext, &mut tracker)?;
        wizard.dispatch(WizardAction::Next, &mut tracker)?;
        assert_eq!(wizard.index(), 3);
    }

    {
        let store = open_store(&temp_dir, "default")?;
        let tracker = ProgressTracker::load(store, &registry)?;
        assert_eq!(tracker.last_index(), 3);
        assert_eq!(tracker.configured_count(&registry), 2);
        assert!(tracker.is_configured("navigate_to"));

        let wizard = Wizard::resume(registry.clone(), &tracker).expect("registry is not empty");
        assert_eq!(wizard.current().name, registry.tools()[3].name);
    }

    Ok(())
}

/// Profiles never share progress
#[test]
fn test_profiles_are_isolated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = ToolRegistry::embedded()?;

    let mut first = ProgressTracker::load(open_store(&temp_dir, "alice")?, &registry)?;
    first.mark_configured("navigate_to")?;

    let second = ProgressTracker::load(open_store(&temp_dir, "bob")?, &registry)?;
    assert!(!second.is_configured("navigate_to"));
    assert_eq!(second.progress_fraction(&registry), 0.0);

    Ok(())
}

/// Out-of-range positions and removed tools from older registries
#[test]
fn test_registry_shrink_is_tolerated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir, "default")?;
    store.set_setting(keys::CONFIGURED_TOOLS, json!(["a", "retired_tool"]))?;
    store.set_setting(keys::LAST_TOOL_INDEX, json!(40))?;

    let registry = Arc::new(ToolRegistry::new(vec![Tool::new("a", "A"), Tool::new("b", "B")])?);
    let mut tracker = ProgressTracker::load(store.clone(), &registry)?;
    assert_eq!(tracker.last_index(), 0);
    assert_eq!(tracker.progress_fraction(&registry), 0.5);
    assert_eq!(tracker.stale_entries(&registry), vec!["retired_tool".to_string()]);

    // Stale entries stay until pruned explicitly
    let reloaded = ProgressTracker::load(store.clone(), &registry)?;
    assert!(reloaded.is_configured("retired_tool"));
    assert_eq!(tracker.prune_stale(&registry)?, 1);
    let reloaded = ProgressTracker::load(store, &registry)?;
    assert!(!reloaded.is_configured("retired_tool"));
    assert!(reloaded.is_configured("a"));

    Ok(())
}

/// A, B, C with C configured: skip lands on B, then reports all configured
#[test]
fn test_skip_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Arc::new(ToolRegistry::new(vec![
        Tool::new("A", "first"),
        Tool::new("B", "second"),
        Tool::new("C", "third"),
    ])?);
    let mut tracker = ProgressTracker::load(open_store(&temp_dir, "default")?, &registry)?;
    tracker.mark_configured("C")?;

    let mut wizard = Wizard::resume(registry.clone(), &tracker).expect("registry is not empty");
    wizard.dispatch(WizardAction::SkipToNextUnconfigured, &mut tracker)?;
    assert_eq!(wizard.current().name, "B");

    tracker.mark_configured("A")?;
    tracker.mark_configured("B")?;
    let notices = wizard.dispatch(WizardAction::SkipToNextUnconfigured, &mut tracker)?;
    assert_eq!(wizard.current().name, "B");
    assert_eq!(notices, vec![Notice::all_configured()]);
    assert_eq!(tracker.progress_fraction(&registry), 1.0);

    Ok(())
}

/// Exports of the embedded registry only differ in their timestamp
#[test]
fn test_embedded_export_is_deterministic() -> Result<()> {
    let registry = ToolRegistry::embedded()?;
    let exporter = Exporter::default();

    let first = exporter.export_all_at(&registry, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let second = exporter.export_all_at(&registry, Utc.timestamp_opt(1_800_000_000, 0).unwrap());
    assert_eq!(first.tools, second.tools);
    assert_eq!(first.registry_digest, second.registry_digest);
    assert_eq!(first.tool_count, registry.total_count());
    assert_eq!(first.category_count, registry.categories().len());
    assert_ne!(first.to_json()?, second.to_json()?);

    let text = first.render(ExportFormat::Text)?;
    assert!(text.starts_with("# ELEC-MATE voice tools for ElevenLabs"));
    assert!(text.contains("Tool: navigate_to"));

    Ok(())
}

/// Object parameters only get their own label when asked for
#[test]
fn test_object_label_is_opt_in() -> Result<()> {
    let registry = ToolRegistry::embedded()?;
    let default = Exporter::default().export_all(&registry);
    let mapped = Exporter::new(TypeLabels::with_object()).export_all(&registry);

    let labels = |doc: &elecmate::export::ExportDocument| -> Vec<String> {
        doc.tools
            .iter()
            .flat_map(|t| t.parameters.iter().map(|p| p.type_label.clone()))
            .collect()
    };
    assert!(!labels(&default).iter().any(|l| l == "Object"));
    assert!(labels(&default).iter().all(|l| ["String", "Number", "Boolean", "Array"].contains(&l.as_str())));
    assert!(labels(&mapped).len() == labels(&default).len());

    Ok(())
}

/// Search and category queries over the shipped registry
#[test]
fn test_embedded_registry_queries() -> Result<()> {
    let registry = ToolRegistry::embedded()?;
    assert!(registry.total_count() > 300);
    assert_eq!(registry.search("").len(), registry.total_count());
    assert!(registry.search("zzz-no-match").is_empty());
    assert_eq!(registry.search("NAVIGATE"), registry.search("navigate"));
    assert!(registry.by_category("Nonexistent").is_empty());

    let total: usize = registry
        .categories()
        .iter()
        .map(|c| registry.by_category(c).len())
        .sum();
    assert!(total <= registry.total_count());

    Ok(())
}

/// Agent credentials written through the file store
#[test]
fn test_agent_settings_persist() -> Result<()> {
    let temp_dir = TempDir::new()?;
    {
        let store = open_store(&temp_dir, "default")?;
        VoiceAgentSettings {
            agent_id: Some("agent_01".to_string()),
            api_key: Some("xi_abcdef123456".to_string()),
        }
        .save(store.as_ref())?;
    }
    let store = open_store(&temp_dir, "default")?;
    let loaded = VoiceAgentSettings::load(store.as_ref())?;
    assert_eq!(loaded.agent_id.as_deref(), Some("agent_01"));
    assert_eq!(loaded.masked_api_key().as_deref(), Some("***********3456"));
    Ok(())
}
