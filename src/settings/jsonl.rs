//! JSONL-backed settings store with in-memory caching.
//!
//! Every write appends one line; on load the lines are replayed and the last
//! record for a key wins. The file is compacted once it holds many more lines
//! than live keys.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::SettingsStore;
use crate::error::{ElecMateError, Result};

const SETTINGS_FILE: &str = "settings.jsonl";

/// Compact when lines exceed live keys by this factor
const COMPACT_FACTOR: usize = 4;

/// One line of the settings log. `value: None` is a tombstone.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingRecord {
    key: String,
    value: Option<Value>,
    updated_at: i64,
}

#[derive(Debug, Default)]
struct Cache {
    values: HashMap<String, Value>,
    lines: usize,
}

/// Settings store persisted as an append-only JSONL file.
pub struct JsonlSettingsStore {
    path: PathBuf,
    cache: RwLock<Cache>,
}

impl std::fmt::Debug for JsonlSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlSettingsStore").field("path", &self.path).finish_non_exhaustive()
    }
}

impl JsonlSettingsStore {
    /// Open or create the store inside `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(SETTINGS_FILE);
        let cache = Self::replay(&path)?;
        debug!("Opened settings at {} ({} keys)", path.display(), cache.values.len());
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Open the store for a named profile under `base_dir/profiles/<profile>`.
    pub fn open_profile(base_dir: impl AsRef<Path>, profile: &str) -> Result<Self> {
        if profile.is_empty() || profile.contains(['/', '\\']) || profile.starts_with('.') {
            return Err(ElecMateError::Validation(format!("Invalid profile name '{}'", profile)));
        }
        Self::open(base_dir.as_ref().join("profiles").join(profile))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn replay(path: &Path) -> Result<Cache> {
        let mut cache = Cache::default();
        if !path.exists() {
            return Ok(cache);
        }

        let reader = BufReader::new(File::open(path)?);
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            // A torn final line from a crash mid-write is skipped, not fatal
            let record: SettingRecord = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping unreadable settings line {} in {}: {}", lineno + 1, path.display(), e);
                    continue;
                }
            };
            cache.lines += 1;
            match record.value {
                Some(value) => cache.values.insert(record.key, value),
                None => cache.values.remove(&record.key),
            };
        }
        Ok(cache)
    }

    fn append(&self, record: &SettingRecord) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    /// Rewrite the file with one line per live key.
    pub fn compact(&self) -> Result<()> {
        let mut cache = self.cache.write().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        self.compact_locked(&mut cache)
    }

    fn compact_locked(&self, cache: &mut Cache) -> Result<()> {
        let tmp = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&tmp)?;
            let now = Utc::now().timestamp_millis();
            let mut keys: Vec<_> = cache.values.keys().cloned().collect();
            keys.sort();
            for key in keys {
                let record = SettingRecord {
                    value: cache.values.get(&key).cloned(),
                    key,
                    updated_at: now,
                };
                writeln!(file, "{}", serde_json::to_string(&record)?)?;
            }
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        cache.lines = cache.values.len();
        debug!("Compacted settings file {}", self.path.display());
        Ok(())
    }

    fn write_record(&self, key: &str, value: Option<Value>) -> Result<()> {
        let record = SettingRecord {
            key: key.to_string(),
            value,
            updated_at: Utc::now().timestamp_millis(),
        };

        // Writers hold the lock from append through compaction so the file
        // and the cache see the same order of records.
        let mut cache = self.cache.write().map_err(|e| ElecMateError::Storage(e.to_string()))?;

        // File first, so a failed write leaves the cache unchanged
        self.append(&record)?;

        match record.value {
            Some(value) => cache.values.insert(record.key, value),
            None => cache.values.remove(&record.key),
        };
        cache.lines += 1;

        // The record is already durable; a failed compaction only leaves the log longer
        if cache.lines > COMPACT_FACTOR * cache.values.len().max(8) {
            if let Err(e) = self.compact_locked(&mut cache) {
                warn!("Failed to compact settings file {}: {}", self.path.display(), e);
            }
        }
        Ok(())
    }
}

impl SettingsStore for JsonlSettingsStore {
    fn get_setting(&self, key: &str) -> Result<Option<Value>> {
        let cache = self.cache.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        Ok(cache.values.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<()> {
        self.write_record(key, Some(value))
    }

    fn remove_setting(&self, key: &str) -> Result<()> {
        let present = {
            let cache = self.cache.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
            cache.values.contains_key(key)
        };
        if present { self.write_record(key, None) } else { Ok(()) }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let cache = self.cache.read().map_err(|e| ElecMateError::Storage(e.to_string()))?;
        let mut keys: Vec<_> = cache.values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
