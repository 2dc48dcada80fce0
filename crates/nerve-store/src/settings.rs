use std::fs;
use std::path::{Path, PathBuf};

use nerve_core::Settings;

use crate::error::{Result, StoreError};
use crate::layout::{settings_path, write_json_atomic};

/// The flat key/value settings file, merged over defaults on load.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(base: &Path) -> Self {
        Self {
            path: settings_path(base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as defaults. A file that exists but does not parse
    /// is an error rather than a silent reset.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.is_file() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|e| {
            StoreError::InvalidData(format!("{}: {e}", self.path.display()))
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        write_json_atomic(&self.path, settings)
    }

    /// Parse and store one key. Unknown keys already in the file survive.
    pub fn set(&self, key: &str, value: &str) -> Result<Settings> {
        let mut settings = self.load()?;
        settings.set(key, value)?;
        self.save(&settings)?;
        tracing::info!(key, value, "setting updated");
        Ok(settings)
    }

    /// Flip a boolean key and return its new value.
    pub fn toggle(&self, key: &str) -> Result<bool> {
        let mut settings = self.load()?;
        let value = settings.toggle(key)?;
        self.save(&settings)?;
        tracing::info!(key, value, "setting toggled");
        Ok(value)
    }
}
