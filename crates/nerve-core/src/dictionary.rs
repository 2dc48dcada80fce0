//! In-memory view of the JSON term dictionaries.
//!
//! Files share no schema. An entry value may be a plain string, a list of
//! `{gloss, synonyms}` objects, or an arbitrary nested object; this module
//! reads all three shapes at lookup time instead of normalizing on load.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// One parsed dictionary file.
#[derive(Clone, Debug)]
pub struct Dictionary {
    /// File name including extension, e.g. `chemistry.json`.
    pub file_name: String,
    /// File stem, e.g. `chemistry`.
    pub stem: String,
    pub entries: Map<String, Value>,
}

impl Dictionary {
    /// Build a dictionary from a parsed JSON document.
    /// Returns `None` when the root is not an object (no term keys to match).
    pub fn from_value(file_name: &str, root: Value) -> Option<Self> {
        match root {
            Value::Object(entries) => Some(Self {
                file_name: file_name.to_string(),
                stem: file_stem(file_name).to_string(),
                entries,
            }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.entries
            .iter()
            .map(|(key, value)| Entry { key, value })
    }
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[..i],
        _ => file_name,
    }
}

/// All loaded dictionaries, keyed by file name. Iteration is in file-name order.
#[derive(Clone, Debug, Default)]
pub struct DictionarySet {
    files: BTreeMap<String, Dictionary>,
}

impl DictionarySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dictionary: Dictionary) {
        self.files.insert(dictionary.file_name.clone(), dictionary);
    }

    pub fn get(&self, file_name: &str) -> Option<&Dictionary> {
        self.files.get(file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dictionary> {
        self.files.values()
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total entries across all files.
    pub fn entry_count(&self) -> usize {
        self.files.values().map(Dictionary::len).sum()
    }

    pub fn stems(&self) -> Vec<String> {
        self.files.values().map(|d| d.stem.clone()).collect()
    }
}

/// A `{gloss, synonyms}` sense read out of an entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sense {
    pub gloss: String,
    pub synonyms: Vec<String>,
}

/// Borrowed view of one dictionary entry.
#[derive(Clone, Copy, Debug)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub value: &'a Value,
}

impl<'a> Entry<'a> {
    /// True when the value is an object or a list holding at least one object.
    /// Only these shapes carry synonym and gloss fields.
    pub fn is_structured(&self) -> bool {
        match self.value {
            Value::Object(_) => true,
            Value::Array(items) => items.iter().any(Value::is_object),
            _ => false,
        }
    }

    /// Senses carried by the entry. Plain strings and objects without
    /// `gloss`/`definition`/`synonyms` fields have none.
    pub fn senses(&self) -> Vec<Sense> {
        match self.value {
            Value::Object(map) => sense_from_object(map).into_iter().collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(sense_from_object)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Best-effort descriptive text for the entry, used for family sniffing
    /// and `order` extraction.
    pub fn gloss_text(&self) -> String {
        let senses = self.senses();
        if !senses.is_empty() {
            return senses
                .iter()
                .map(|s| s.gloss.as_str())
                .filter(|g| !g.is_empty())
                .collect::<Vec<_>>()
                .join("; ");
        }
        match self.value {
            Value::String(s) => s.clone(),
            Value::Object(map) => {
                for field in ["description", "summary", "text"] {
                    if let Some(Value::String(s)) = map.get(field) {
                        return s.clone();
                    }
                }
                map.values()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; ")
            }
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// The raw entry rendered as text: strings verbatim, the first gloss for
    /// sense-bearing entries, compact JSON otherwise.
    pub fn raw_text(&self) -> String {
        if let Value::String(s) = self.value {
            return s.clone();
        }
        if let Some(sense) = self.senses().into_iter().find(|s| !s.gloss.is_empty()) {
            return sense.gloss;
        }
        match self.value {
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

fn sense_from_object(map: &Map<String, Value>) -> Option<Sense> {
    let gloss = ["gloss", "definition"]
        .iter()
        .find_map(|f| map.get(*f).and_then(Value::as_str))
        .map(str::to_string);
    let synonyms = match map.get("synonyms") {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>(),
        ),
        Some(Value::String(s)) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    };

    if gloss.is_none() && synonyms.is_none() {
        return None;
    }
    Some(Sense {
        gloss: gloss.unwrap_or_default(),
        synonyms: synonyms.unwrap_or_default(),
    })
}
