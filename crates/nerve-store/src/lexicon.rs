use std::fs;
use std::path::{Path, PathBuf};

use nerve_core::{Dictionary, DictionarySet};

use crate::error::{Result, StoreError};
use crate::layout::SETTINGS_FILE;

/// A dictionary file that could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a data directory: the usable dictionaries plus every
/// file that was passed over.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub dictionaries: DictionarySet,
    pub skipped: Vec<SkippedFile>,
}

fn is_dictionary_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        && path.file_name().is_some_and(|name| name != SETTINGS_FILE)
}

/// Load every top-level `*.json` file under `dir` (not recursive).
///
/// Unreadable files, malformed JSON and non-object roots are warned about
/// and skipped. Only a missing or unreadable directory is an error.
pub fn load_dictionaries(dir: &Path) -> Result<LoadReport> {
    if !dir.is_dir() {
        return Err(StoreError::NotFound(format!(
            "data directory {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_dictionary_file(p))
        .collect();
    paths.sort();

    let mut report = LoadReport::default();
    for path in paths {
        match load_one(&path) {
            Ok(dictionary) => {
                tracing::debug!(
                    file = %dictionary.file_name,
                    entries = dictionary.len(),
                    "loaded dictionary"
                );
                report.dictionaries.insert(dictionary);
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "skipping dictionary file");
                report.skipped.push(SkippedFile { path, reason });
            }
        }
    }

    tracing::info!(
        files = report.dictionaries.len(),
        entries = report.dictionaries.entry_count(),
        skipped = report.skipped.len(),
        "dictionaries loaded from {}",
        dir.display()
    );
    Ok(report)
}

fn load_one(path: &Path) -> std::result::Result<Dictionary, String> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| "no file name".to_string())?;
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let root: serde_json::Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    Dictionary::from_value(&file_name, root).ok_or_else(|| "root is not a JSON object".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_loads_top_level_json_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "chemistry.json", r#"{"electron": "a particle"}"#);
        write(dir.path(), "math.json", r#"{"matrix": [{"gloss": "array"}]}"#);
        write(dir.path(), "notes.txt", "not a dictionary");
        write(dir.path(), SETTINGS_FILE, r#"{"style": "brief"}"#);
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "deep.json", r#"{"x": "y"}"#);

        let report = load_dictionaries(dir.path()).unwrap();
        assert_eq!(report.dictionaries.stems(), vec!["chemistry", "math"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_malformed_files_are_skipped_and_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.json", r#"{"ok": "fine"}"#);
        write(dir.path(), "broken.json", "{not json");
        write(dir.path(), "list.json", r#"["a", "b"]"#);

        let report = load_dictionaries(dir.path()).unwrap();
        assert_eq!(report.dictionaries.len(), 1);
        assert!(report.dictionaries.get("good.json").is_some());

        let mut skipped: Vec<String> = report
            .skipped
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        skipped.sort();
        assert_eq!(skipped, vec!["broken.json", "list.json"]);
        assert!(report.skipped.iter().any(|s| s.reason.contains("not a JSON object")));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let report = load_dictionaries(dir.path()).unwrap();
        assert!(report.dictionaries.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = load_dictionaries(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
