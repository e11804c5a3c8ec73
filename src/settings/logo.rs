//! Company logo validation.
//!
//! Logos are checked locally before anything is stored or uploaded.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use super::traits::{SettingsStore, keys, set_typed};
use crate::error::{ElecMateError, Result};

/// Largest accepted logo file
pub const MAX_LOGO_BYTES: u64 = 2 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp"];

/// Display size of the logo on generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// A logo file that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoUpload {
    pub path: PathBuf,
    pub bytes: u64,
}

impl LogoUpload {
    /// Validate a candidate logo file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ElecMateError::Validation(format!(
                "Logo must be one of {}, got '{}'",
                ALLOWED_EXTENSIONS.join(", "),
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ElecMateError::Validation(format!("Cannot read logo {}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(ElecMateError::Validation(format!("{} is not a file", path.display())));
        }
        check_size(metadata.len())?;

        Ok(Self {
            path: path.to_path_buf(),
            bytes: metadata.len(),
        })
    }

    /// Record the logo location and display size.
    pub fn save(&self, store: &dyn SettingsStore, size: LogoSize) -> Result<()> {
        set_typed(store, keys::COMPANY_LOGO_PATH, &self.path)?;
        set_typed(store, keys::COMPANY_LOGO_SIZE, &size)?;
        info!("Saved company logo {} ({} bytes)", self.path.display(), self.bytes);
        Ok(())
    }
}

fn check_size(bytes: u64) -> Result<()> {
    if bytes == 0 {
        return Err(ElecMateError::Validation("Logo file is empty".to_string()));
    }
    if bytes > MAX_LOGO_BYTES {
        return Err(ElecMateError::Validation(format!(
            "Logo is {:.1} MiB, the limit is 2 MiB",
            bytes as f64 / (1024.0 * 1024.0)
        )));
    }
    Ok(())
}
