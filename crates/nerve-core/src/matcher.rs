use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{DictionarySet, Entry};
use crate::tokenizer::{fold, normalize};

/// Which part of an entry a keyword hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Key,
    Synonym,
    Gloss,
}

impl MatchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Synonym => "synonym",
            Self::Gloss => "gloss",
        }
    }
}

/// A single keyword hit against one dictionary entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub keyword: String,
    pub file: String,
    pub stem: String,
    pub entry_key: String,
    pub entry_value: Value,
    pub field: MatchField,
    /// The text that matched: the synonym list joined with `, ` or the gloss.
    /// Empty for key matches.
    pub detail: String,
}

impl Match {
    pub fn entry(&self) -> Entry<'_> {
        Entry {
            key: &self.entry_key,
            value: &self.entry_value,
        }
    }
}

/// Substring containment in either direction. Empty strings never match.
fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Test one normalized keyword against one entry.
/// Key beats synonym beats gloss; at most one hit per entry.
fn match_entry(keyword: &str, entry: &Entry<'_>) -> Option<(MatchField, String)> {
    if contains_either(&normalize(entry.key), keyword) {
        return Some((MatchField::Key, String::new()));
    }
    if !entry.is_structured() {
        return None;
    }

    let senses = entry.senses();
    for sense in &senses {
        if sense
            .synonyms
            .iter()
            .any(|syn| contains_either(&fold(syn), keyword))
        {
            return Some((MatchField::Synonym, sense.synonyms.join(", ")));
        }
    }
    for sense in &senses {
        if fold(&sense.gloss).contains(keyword) {
            return Some((MatchField::Gloss, sense.gloss.clone()));
        }
    }
    None
}

/// Match every keyword against every entry of every dictionary.
///
/// Returns all hits unranked, in keyword order, then file-name order, then
/// entry order. Keywords that normalize to nothing produce no hits.
pub fn find_matches(keywords: &[String], dictionaries: &DictionarySet) -> Vec<Match> {
    let mut matches = Vec::new();

    for keyword in keywords {
        let normalized = normalize(keyword);
        if normalized.is_empty() {
            continue;
        }
        for dictionary in dictionaries.iter() {
            for entry in dictionary.entries() {
                if let Some((field, detail)) = match_entry(&normalized, &entry) {
                    matches.push(Match {
                        keyword: keyword.clone(),
                        file: dictionary.file_name.clone(),
                        stem: dictionary.stem.clone(),
                        entry_key: entry.key.to_string(),
                        entry_value: entry.value.clone(),
                        field,
                        detail,
                    });
                }
            }
        }
    }

    matches
}
