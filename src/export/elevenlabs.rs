//! ElevenLabs tool formatting.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::labels::TypeLabels;
use crate::tools::Tool;

/// One parameter as entered in the platform's tool form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevenLabsParameter {
    pub identifier: String,
    #[serde(rename = "type")]
    pub type_label: String,
    pub required: bool,
    pub description: String,
    pub enum_values: Vec<String>,
}

/// A tool as entered in the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevenLabsTool {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub parameters: Vec<ElevenLabsParameter>,
    pub wait_for_response: bool,
    pub disable_interruptions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
}

/// Convert a registry tool to the platform shape
pub fn format_tool(tool: &Tool, labels: &TypeLabels) -> ElevenLabsTool {
    ElevenLabsTool {
        name: tool.name.clone(),
        description: tool.description.clone(),
        category: tool.category.clone(),
        parameters: tool
            .parameters
            .iter()
            .map(|p| ElevenLabsParameter {
                identifier: p.name.clone(),
                type_label: labels.label(p.param_type).to_string(),
                required: p.required,
                description: p.description.clone(),
                enum_values: p.enum_slice().to_vec(),
            })
            .collect(),
        wait_for_response: tool.waits_for_response(),
        disable_interruptions: tool.disables_interruptions(),
        execution_mode: tool.execution_mode.map(|m| m.as_str().to_string()),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Human-readable block for manual entry
pub fn render_text(tool: &ElevenLabsTool) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Tool: {}", tool.name);
    if let Some(category) = &tool.category {
        let _ = writeln!(out, "Category: {}", category);
    }
    let _ = writeln!(out, "Description: {}", tool.description);
    let _ = writeln!(out, "Wait for response: {}", yes_no(tool.wait_for_response));
    let _ = writeln!(out, "Disable interruptions: {}", yes_no(tool.disable_interruptions));
    if let Some(mode) = &tool.execution_mode {
        let _ = writeln!(out, "Execution mode: {}", mode);
    }

    if tool.parameters.is_empty() {
        let _ = writeln!(out, "Parameters: none");
    } else {
        let _ = writeln!(out, "Parameters:");
        for p in &tool.parameters {
            let _ = writeln!(
                out,
                "  - {} ({}, {}): {}",
                p.identifier,
                p.type_label,
                if p.required { "required" } else { "optional" },
                p.description
            );
            if !p.enum_values.is_empty() {
                let _ = writeln!(out, "    Enum: {}", p.enum_values.join(", "));
            }
        }
    }
    out
}
