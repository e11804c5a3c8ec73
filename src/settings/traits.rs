//! Settings store trait and well-known keys.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// Keys written by this crate.
pub mod keys {
    pub const ELEVENLABS_AGENT_ID: &str = "elevenlabs_agent_id";
    pub const ELEVENLABS_API_KEY: &str = "elevenlabs_api_key";
    pub const CONFIGURED_TOOLS: &str = "voice_tools_configured";
    pub const LAST_TOOL_INDEX: &str = "voice_tools_last_index";
    pub const COMPANY_LOGO_PATH: &str = "company_logo_path";
    pub const COMPANY_LOGO_SIZE: &str = "company_logo_size";
}

/// Key-value persistence for user settings.
///
/// Implementations must be safe to share behind an `Arc`; writes are
/// visible to subsequent reads from any handle.
pub trait SettingsStore: Send + Sync {
    /// Read a setting, `None` if it has never been written or was removed.
    fn get_setting(&self, key: &str) -> Result<Option<Value>>;

    /// Write a setting, replacing any previous value.
    fn set_setting(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a setting. Removing a missing key is not an error.
    fn remove_setting(&self, key: &str) -> Result<()>;

    /// All keys currently set.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Read a setting and decode it into `T`.
pub fn get_typed<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str) -> Result<Option<T>> {
    match store.get_setting(key)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode `value` and write it.
pub fn set_typed<T: Serialize>(store: &dyn SettingsStore, key: &str, value: &T) -> Result<()> {
    store.set_setting(key, serde_json::to_value(value)?)
}
