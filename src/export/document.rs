//! Whole-registry export documents.
//!
//! An export depends only on the tools handed to it and the timestamp, so
//! two exports of the same registry differ in `generated_at` alone.

use std::collections::HashSet;
use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::elevenlabs::{ElevenLabsTool, format_tool, render_text};
use super::labels::TypeLabels;
use crate::error::Result;
use crate::tools::{Tool, ToolRegistry};

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
}

/// Structured export of a set of tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub generated_at: DateTime<Utc>,
    pub tool_count: usize,
    pub category_count: usize,
    pub registry_digest: String,
    pub tools: Vec<ElevenLabsTool>,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Commented header followed by one block per tool
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# ELEC-MATE voice tools for ElevenLabs");
        let _ = writeln!(
            out,
            "# Generated: {}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let _ = writeln!(out, "# Tools: {}", self.tool_count);
        let _ = writeln!(out, "# Categories: {}", self.category_count);
        let _ = writeln!(out, "# Registry digest: {}", self.registry_digest);
        for tool in &self.tools {
            out.push('\n');
            out.push_str(&render_text(tool));
        }
        out
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }
}

/// Builds export documents
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    labels: TypeLabels,
}

impl Exporter {
    pub fn new(labels: TypeLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &TypeLabels {
        &self.labels
    }

    /// Format one tool
    pub fn format_tool(&self, tool: &Tool) -> ElevenLabsTool {
        format_tool(tool, &self.labels)
    }

    /// Export every registry tool, stamped now
    pub fn export_all(&self, registry: &ToolRegistry) -> ExportDocument {
        self.export_all_at(registry, Utc::now())
    }

    /// Export every registry tool with a fixed timestamp
    pub fn export_all_at(&self, registry: &ToolRegistry, generated_at: DateTime<Utc>) -> ExportDocument {
        self.export_tools_at(registry.tools(), registry.digest(), generated_at)
    }

    /// Export a subset of tools, e.g. one category or a search result
    pub fn export_tools_at<'a, I>(&self, tools: I, registry_digest: String, generated_at: DateTime<Utc>) -> ExportDocument
    where
        I: IntoIterator<Item = &'a Tool>,
    {
        let tools: Vec<&Tool> = tools.into_iter().collect();
        let mut categories = HashSet::new();
        for tool in &tools {
            if let Some(category) = tool.category.as_deref() {
                categories.insert(category);
            }
        }

        ExportDocument {
            generated_at,
            tool_count: tools.len(),
            category_count: categories.len(),
            registry_digest,
            tools: tools.iter().map(|t| self.format_tool(t)).collect(),
        }
    }
}
