//! In-memory settings store, used by tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::traits::SettingsStore;
use crate::error::{ElecMateError, Result};

/// Settings store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, Value>>,
    fail_writes: RwLock<bool>,
    fail_key: RwLock<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.write() {
            *flag = fail;
        }
    }

    /// Make writes to one key fail while others succeed.
    pub fn set_fail_key(&self, key: Option<&str>) {
        if let Ok(mut slot) = self.fail_key.write() {
            *slot = key.map(str::to_string);
        }
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        let fail = self.fail_writes.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        if *fail {
            return Err(ElecMateError::Storage("settings store is read-only".to_string()));
        }
        let fail_key = self.fail_key.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        if fail_key.as_deref() == Some(key) {
            return Err(ElecMateError::Storage(format!("cannot write {}", key)));
        }
        Ok(())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_setting(&self, key: &str) -> Result<Option<Value>> {
        let values = self.values.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<()> {
        self.check_writable(key)?;
        let mut values = self.values.write().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_setting(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        let mut values = self.values.write().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        let mut keys: Vec<_> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
