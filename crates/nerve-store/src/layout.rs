use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, StoreError};

/// Subdirectory of the data directory holding one JSON file per session.
pub const SESSIONS_DIR: &str = "nerve_sessions";

/// Settings file name. Never treated as a dictionary.
pub const SETTINGS_FILE: &str = "anemone_settings.json";

/// Data directory used when neither a flag nor `NERVE_DATA_DIR` names one.
///
/// Layout:
/// ```text
/// data/
/// ├── anemone_settings.json
/// ├── chemistry.json          (dictionaries, one per file)
/// ├── ...
/// └── nerve_sessions/
///     ├── <session-id>.json
///     └── ...
/// ```
pub fn default_base_dir() -> PathBuf {
    PathBuf::from("data")
}

pub fn sessions_dir(base: &Path) -> PathBuf {
    base.join(SESSIONS_DIR)
}

pub fn settings_path(base: &Path) -> PathBuf {
    base.join(SETTINGS_FILE)
}

/// Sanitize an id for use as a file name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write pretty JSON through a sibling temp file and rename it into place,
/// so readers never observe a truncated file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::InvalidData(format!("no parent for {}", path.display())))?;
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = parent.join(format!(".{file_name}.tmp"));

    let json = serde_json::to_vec_pretty(value)?;
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
