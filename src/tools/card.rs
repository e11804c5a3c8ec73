//! Tool card: the list-view rendering of one registry entry.

use crate::error::Result;
use crate::export::{TypeLabels, format_tool, render_text};

use super::definition::Tool;

/// Which part of a tool a copy action puts on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CopyField {
    Name,
    Description,
    /// Parameters as platform JSON
    Parameters,
    /// Full text block
    Full,
}

impl CopyField {
    /// What was copied, for notices
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Tool name",
            Self::Description => "Description",
            Self::Parameters => "Parameters",
            Self::Full => "Tool definition",
        }
    }
}

/// A tool together with its display state
#[derive(Debug, Clone, Copy)]
pub struct ToolCard<'a> {
    pub tool: &'a Tool,
    pub configured: bool,
    pub expanded: bool,
}

impl<'a> ToolCard<'a> {
    pub fn new(tool: &'a Tool, configured: bool) -> Self {
        Self {
            tool,
            configured,
            expanded: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// One-line summary shown when collapsed
    pub fn summary_line(&self) -> String {
        let marker = if self.configured { "[x]" } else { "[ ]" };
        let params = match self.tool.parameters.len() {
            0 => "no params".to_string(),
            1 => "1 param".to_string(),
            n => format!("{} params", n),
        };
        match &self.tool.category {
            Some(category) => format!("{} {} ({}, {})", marker, self.tool.name, category, params),
            None => format!("{} {} ({})", marker, self.tool.name, params),
        }
    }

    /// Summary plus, when expanded, the detail lines
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.summary_line()];
        if !self.expanded {
            return lines;
        }

        lines.push(format!("    {}", self.tool.description));
        let mut flags = Vec::new();
        if self.tool.waits_for_response() {
            flags.push("waits for response");
        }
        if self.tool.disables_interruptions() {
            flags.push("no interruptions");
        }
        if let Some(mode) = self.tool.execution_mode {
            flags.push(mode.as_str());
        }
        if !flags.is_empty() {
            lines.push(format!("    [{}]", flags.join(", ")));
        }
        for p in &self.tool.parameters {
            let req = if p.required { "*" } else { "" };
            lines.push(format!("    - {}{}: {} ({})", p.name, req, p.description, p.param_type));
            if !p.enum_slice().is_empty() {
                lines.push(format!("        one of: {}", p.enum_slice().join(", ")));
            }
        }
        lines
    }

    /// Text placed on the clipboard for a copy action
    pub fn copy_text(&self, field: CopyField, labels: &TypeLabels) -> Result<String> {
        Ok(match field {
            CopyField::Name => self.tool.name.clone(),
            CopyField::Description => self.tool.description.clone(),
            CopyField::Parameters => serde_json::to_string_pretty(&format_tool(self.tool, labels).parameters)?,
            CopyField::Full => render_text(&format_tool(self.tool, labels)),
        })
    }
}
