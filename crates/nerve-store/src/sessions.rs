use std::fs;
use std::path::{Path, PathBuf};

use nerve_core::{Analysis, Session, SessionItem, SessionSummary};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::layout::{sanitize_name, sessions_dir, write_json_atomic};

/// One JSON file per session under `<data>/nerve_sessions/`.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the session directory under a data directory, creating it.
    pub fn open(base: &Path) -> Result<Self> {
        let dir = sessions_dir(base);
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(id)))
    }

    /// Freeze an analysis into a new session and write it.
    /// A random id is assigned when `id` is `None` or blank.
    pub fn create(
        &self,
        analysis: Analysis,
        id: Option<&str>,
        dictionaries: Vec<String>,
    ) -> Result<Session> {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(given) => sanitize_name(given),
            None => Uuid::new_v4().simple().to_string(),
        };
        let session = Session::from_analysis(
            &id,
            &nerve_core::time::now_iso8601(),
            analysis,
            dictionaries,
        );
        self.save(&session)?;
        tracing::info!(id = %session.id, items = session.items.len(), "session created");
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.path_for(&session.id);
        write_json_atomic(&path, session)?;
        tracing::debug!(path = %path.display(), "session written");
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<Session> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(format!("session {id}")));
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Summaries of every readable session, newest first.
    /// Unreadable session files are warned about and left out.
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|text| Ok(serde_json::from_str::<Session>(&text)?));
            match parsed {
                Ok(session) => summaries.push(session.summary()),
                Err(e) => tracing::warn!(path = %path.display(), "skipping session file: {e}"),
            }
        }
        summaries.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    /// Mark one item explored and persist. Errors on an unknown session or
    /// an out-of-range index.
    pub fn mark_explored(&self, id: &str, index: usize) -> Result<SessionItem> {
        let mut session = self.load(id)?;
        let len = session.items.len();
        let item = session
            .mark_explored(index)
            .cloned()
            .ok_or_else(|| {
                StoreError::InvalidData(format!("item {index} out of range (session has {len})"))
            })?;
        self.save(&session)?;
        Ok(item)
    }

    /// Expand a variable within a stored session and persist the explored marks.
    /// An unknown variable returns an empty list and writes nothing.
    pub fn expand(&self, id: &str, variable: &str) -> Result<Vec<SessionItem>> {
        let mut session = self.load(id)?;
        let related = session.expand_variable(variable);
        if !related.is_empty() {
            self.save(&session)?;
        }
        Ok(related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nerve_core::{Dictionary, DictionarySet, analyze};
    use serde_json::json;
    use tempfile::TempDir;

    fn make_set() -> DictionarySet {
        let mut set = DictionarySet::new();
        set.insert(
            Dictionary::from_value(
                "chemistry.json",
                json!({
                    "electron": "a subatomic particle found in atomic orbitals",
                    "valence": [{"gloss": "the combining capacity of an atom", "synonyms": ["valency"]}],
                    "ion": "a charged atom"
                }),
            )
            .unwrap(),
        );
        set
    }

    fn make_analysis() -> Analysis {
        analyze("electron valence; ion", &make_set(), 8)
    }

    fn open() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (dir, store) = open();
        assert!(dir.path().join("nerve_sessions").is_dir());
        assert_eq!(store.dir(), dir.path().join("nerve_sessions"));
    }

    #[test]
    fn test_create_assigns_random_id() {
        let (_dir, store) = open();
        let a = store.create(make_analysis(), None, vec![]).unwrap();
        let b = store.create(make_analysis(), Some("  "), vec![]).unwrap();
        assert_eq!(a.id.len(), 32);
        assert_ne!(a.id, b.id);
        assert!(store.exists(&a.id));
    }

    #[test]
    fn test_create_with_given_id_is_sanitized() {
        let (_dir, store) = open();
        let s = store.create(make_analysis(), Some("my chem/run"), vec![]).unwrap();
        assert_eq!(s.id, "my_chem_run");
        assert!(store.path_for("my_chem_run").is_file());
    }

    #[test]
    fn test_roundtrip_identical_items() {
        let (_dir, store) = open();
        let created = store
            .create(make_analysis(), Some("rt"), vec!["chemistry".into()])
            .unwrap();
        let loaded = store.load("rt").unwrap();
        assert_eq!(loaded.items, created.items);
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = open();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_is_json_error() {
        let (_dir, store) = open();
        fs::write(store.path_for("bad"), "{truncated").unwrap();
        assert!(matches!(store.load("bad"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_mark_explored_persists_without_reordering() {
        let (_dir, store) = open();
        let created = store.create(make_analysis(), Some("m"), vec![]).unwrap();
        let last = created.items.len() - 1;
        let item = store.mark_explored("m", last).unwrap();
        assert!(item.explored);

        let loaded = store.load("m").unwrap();
        assert!(loaded.items[last].explored);
        let before: Vec<_> = created.items.iter().map(|i| &i.taxon.variable).collect();
        let after: Vec<_> = loaded.items.iter().map(|i| &i.taxon.variable).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_mark_explored_out_of_range() {
        let (_dir, store) = open();
        store.create(make_analysis(), Some("m"), vec![]).unwrap();
        assert!(matches!(
            store.mark_explored("m", 999),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_expand_persists() {
        let (_dir, store) = open();
        store.create(make_analysis(), Some("e"), vec![]).unwrap();
        let related = store.expand("e", "electron").unwrap();
        assert_eq!(related[0].taxon.variable, "electron");

        let loaded = store.load("e").unwrap();
        assert!(
            loaded
                .items
                .iter()
                .filter(|i| i.taxon.variable == "electron")
                .all(|i| i.explored)
        );
        assert!(store.expand("e", "neutrino").unwrap().is_empty());
    }

    #[test]
    fn test_list_newest_first_and_skips_junk() {
        let (_dir, store) = open();
        let mut old = store.create(make_analysis(), Some("old"), vec![]).unwrap();
        old.created = "2020-01-01T00:00:00Z".to_string();
        store.save(&old).unwrap();
        store.create(make_analysis(), Some("new"), vec![]).unwrap();
        fs::write(store.path_for("junk"), "not json").unwrap();
        fs::write(store.dir().join("readme.txt"), "ignore me").unwrap();

        let list = store.list().unwrap();
        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(list[0].prompt, "electron valence; ion");
    }
}
