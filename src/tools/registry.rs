//! Tool registry loading from YAML
//!
//! The registry is an ordered, immutable list of voice tools. The embedded
//! catalog ships with the binary; a replacement file can be loaded instead.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{ElecMateError, Result};

use super::definition::Tool;

const EMBEDDED_REGISTRY: &str = include_str!("../../data/voice_tools.yaml");

/// YAML file structure
#[derive(Debug, Deserialize)]
struct YamlRegistry {
    #[serde(default)]
    tools: Vec<Tool>,
}

/// Ordered catalog of voice tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Build a registry from tools, rejecting duplicate names
    pub fn new(tools: Vec<Tool>) -> Result<Self> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name.as_str()) {
                return Err(ElecMateError::Registry(format!("Duplicate tool name '{}'", tool.name)));
            }
            let mut params = HashSet::new();
            for param in &tool.parameters {
                if !params.insert(param.name.as_str()) {
                    return Err(ElecMateError::Registry(format!(
                        "Duplicate parameter '{}' in tool '{}'",
                        param.name, tool.name
                    )));
                }
            }
        }
        Ok(Self { tools })
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_REGISTRY)
    }

    /// Load registry from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ElecMateError::Registry(format!("Failed to read registry file {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load registry from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let parsed: YamlRegistry = serde_yaml::from_str(content)?;
        let registry = Self::new(parsed.tools)?;
        debug!("Loaded registry with {} tools", registry.len());
        Ok(registry)
    }

    /// All tools in registry order
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Tool at an index
    pub fn at(&self, index: usize) -> Option<&Tool> {
        self.tools.get(index)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Index of a tool by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tools.iter().position(|t| t.name == name)
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Number of tools, always derived from the current list
    pub fn total_count(&self) -> usize {
        self.tools.len()
    }

    /// Unique categories in first-seen order. Uncategorised tools are skipped.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .filter_map(|t| t.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Tools whose category matches exactly
    pub fn by_category(&self, category: &str) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|t| t.category.as_deref() == Some(category))
            .collect()
    }

    /// Case-insensitive search. An empty query returns every tool.
    pub fn search(&self, query: &str) -> Vec<&Tool> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self.tools.iter().collect();
        }
        self.tools.iter().filter(|t| t.matches_lowercase(&needle)).collect()
    }

    /// SHA-256 of the canonical JSON form of the registry
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for tool in &self.tools {
            // Tool serialization is infallible: plain strings, bools and enums
            if let Ok(bytes) = serde_json::to_vec(tool) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}
