//! ElevenLabs agent credentials kept in the settings store.

use log::info;
use serde_json::Value;

use super::traits::{SettingsStore, get_typed, keys};
use crate::error::{ElecMateError, Result};

/// Identifier and API key of the external voice agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceAgentSettings {
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
}

impl VoiceAgentSettings {
    /// Read both values; missing keys load as `None`.
    pub fn load(store: &dyn SettingsStore) -> Result<Self> {
        Ok(Self {
            agent_id: get_typed(store, keys::ELEVENLABS_AGENT_ID)?,
            api_key: get_typed(store, keys::ELEVENLABS_API_KEY)?,
        })
    }

    /// Validate, then write. Nothing is written if validation fails.
    pub fn save(&self, store: &dyn SettingsStore) -> Result<()> {
        let agent_id = normalize(self.agent_id.as_deref());
        let api_key = normalize(self.api_key.as_deref());

        match &agent_id {
            None => return Err(ElecMateError::Validation("Agent ID is required".to_string())),
            Some(id) if id.chars().any(char::is_whitespace) => {
                return Err(ElecMateError::Validation("Agent ID must not contain spaces".to_string()));
            }
            Some(_) => {}
        }

        write_optional(store, keys::ELEVENLABS_AGENT_ID, agent_id)?;
        write_optional(store, keys::ELEVENLABS_API_KEY, api_key)?;
        info!("Saved voice agent settings");
        Ok(())
    }

    /// True once an agent ID is stored
    pub fn is_configured(&self) -> bool {
        self.agent_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().min(4);
            let hidden = chars.len() - visible;
            let tail: String = chars[hidden..].iter().collect();
            format!("{}{}", "*".repeat(hidden.min(12)), tail)
        })
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn write_optional(store: &dyn SettingsStore, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => store.set_setting(key, Value::String(v)),
        None => store.remove_setting(key),
    }
}
