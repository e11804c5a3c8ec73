//! Voice tool definitions
//!
//! A tool is one function the voice agent can call. Its parameters are entered
//! into the agent platform in the order they are listed here.

use serde::{Deserialize, Serialize};

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Any type name the loader did not recognise
    #[serde(other)]
    Other,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When the agent platform runs the tool relative to speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Fire and forget while the agent keeps talking
    Immediate,
    /// Agent waits for the tool result before replying
    #[serde(alias = "wait")]
    Deferred,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Deferred => "deferred",
        }
    }
}

/// A single named input of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Allowed values, in display order
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ToolParameter {
    /// Create a new optional parameter
    pub fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            enum_values: None,
        }
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict the parameter to a fixed set of values
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Enum values, or an empty slice when unrestricted
    pub fn enum_slice(&self) -> &[String] {
        self.enum_values.as_deref().unwrap_or(&[])
    }
}

/// A voice tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, unique across the registry
    pub name: String,
    /// What the agent should use the tool for
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_response: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_interruptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
}

impl Tool {
    /// Create a new tool definition with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            category: None,
            wait_for_response: None,
            disable_interruptions: None,
            execution_mode: None,
        }
    }

    /// Set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set response/interruption flags
    pub fn with_flags(mut self, wait_for_response: bool, disable_interruptions: bool) -> Self {
        self.wait_for_response = Some(wait_for_response);
        self.disable_interruptions = Some(disable_interruptions);
        self
    }

    /// Set execution mode
    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = Some(mode);
        self
    }

    pub fn waits_for_response(&self) -> bool {
        self.wait_for_response.unwrap_or(false)
    }

    pub fn disables_interruptions(&self) -> bool {
        self.disable_interruptions.unwrap_or(false)
    }

    /// Number of required parameters
    pub fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.required).count()
    }

    /// Case-insensitive match against name, description, category and enum values.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
            || self
                .parameters
                .iter()
                .flat_map(|p| p.enum_slice())
                .any(|v| v.to_lowercase().contains(needle))
    }
}
