//! Parameter type labels used by the agent platform.
//!
//! The mapping is total: every `ParamType` resolves to a label, with types
//! missing from the table falling back to `"String"`.

use std::collections::BTreeMap;

use crate::tools::ParamType;

/// Label used when a type has no entry in the table
pub const FALLBACK_LABEL: &str = "String";

/// Lookup table from parameter type to platform label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLabels {
    labels: BTreeMap<ParamType, &'static str>,
}

impl TypeLabels {
    /// Table with an explicit label for objects as well
    pub fn with_object() -> Self {
        let mut labels = Self::default();
        labels.labels.insert(ParamType::Object, "Object");
        labels
    }

    /// Label for a type, falling back to `"String"`
    pub fn label(&self, param_type: ParamType) -> &'static str {
        self.labels.get(&param_type).copied().unwrap_or(FALLBACK_LABEL)
    }

    /// Whether the type has an explicit entry
    pub fn is_mapped(&self, param_type: ParamType) -> bool {
        self.labels.contains_key(&param_type)
    }
}

impl Default for TypeLabels {
    /// The four types the platform's tool form offers
    fn default() -> Self {
        let labels = BTreeMap::from([
            (ParamType::String, "String"),
            (ParamType::Number, "Number"),
            (ParamType::Boolean, "Boolean"),
            (ParamType::Array, "Array"),
        ]);
        Self { labels }
    }
}
