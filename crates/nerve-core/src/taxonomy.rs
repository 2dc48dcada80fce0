//! Deterministic taxonomy for dictionary matches.
//!
//! The biological names are metaphors: kingdom is a group of dictionary
//! files, phylum one file, family a content category sniffed from the
//! gloss, order a detail snippet, variable the entry itself.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::ORDER_SNIPPET_CHARS;
use crate::matcher::{Match, MatchField};

static FORMULA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[A-Za-z0-9_^()]+\s*(?:<=|>=|!=|=|<|>|≤|≥)\s*[A-Za-z0-9_^().]+(?:\s*[+\-*/]\s*[A-Za-z0-9_^().]+)*",
    )
    .unwrap()
});
static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static KINGDOM_RULES: LazyLock<Vec<(Kingdom, Regex)>> =
    LazyLock::new(|| word_start_rules(KINGDOM_TABLE));
static FAMILY_RULES: LazyLock<Vec<(Family, Regex)>> =
    LazyLock::new(|| word_start_rules(FAMILY_TABLE));

/// One regex per table row. A needle only hits at the start of a word, so
/// `atom` finds "atoms" but not "anatomy". Spaces in a needle accept any
/// separator run (`linear algebra` also finds `linear_algebra`).
fn word_start_rules<T: Copy>(table: &[(T, &[&str])]) -> Vec<(T, Regex)> {
    table
        .iter()
        .map(|(tag, needles)| {
            let alternatives = needles
                .iter()
                .map(|n| {
                    n.split_whitespace()
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join("[^a-z0-9]+")
                })
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!("(?:^|[^a-z0-9])(?:{alternatives})");
            (*tag, Regex::new(&pattern).unwrap())
        })
        .collect()
}

/// First row whose regex hits the lowercased text.
fn first_rule<T: Copy>(rules: &[(T, Regex)], text: &str) -> Option<T> {
    let text = text.to_lowercase();
    rules
        .iter()
        .find(|(_, re)| re.is_match(&text))
        .map(|(tag, _)| *tag)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kingdom {
    Math,
    Science,
    Code,
    Definitions,
    Other,
}

const KINGDOM_TABLE: &[(Kingdom, &[&str])] = &[
    (
        Kingdom::Math,
        &["math", "algebra", "geometry", "calculus", "statistic", "number", "topology"],
    ),
    (
        Kingdom::Science,
        &[
            "science", "chem", "physic", "biolog", "metabolite", "drug", "element", "astro",
            "geolog", "medic",
        ],
    ),
    (
        Kingdom::Code,
        &["code", "program", "python", "rust", "javascript", "api", "software", "algorithm"],
    ),
    (
        Kingdom::Definitions,
        &["definition", "glossary", "dictionary", "term", "wordnet", "vocab", "lexicon"],
    ),
];

impl Kingdom {
    /// Fixed lookup from dictionary file stem. First table row wins.
    pub fn from_stem(stem: &str) -> Self {
        first_rule(&KINGDOM_RULES, stem).unwrap_or(Kingdom::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Science => "science",
            Self::Code => "code",
            Self::Definitions => "definitions",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Theorem,
    Formula,
    Metabolite,
    Drug,
    Atomic,
    LinearAlgebra,
    General,
}

const FAMILY_TABLE: &[(Family, &[&str])] = &[
    (Family::Theorem, &["theorem", "lemma", "corollary"]),
    (Family::Formula, &["formula", "equation"]),
    (Family::Metabolite, &["metabolite", "metabolism", "metabolic"]),
    (Family::Drug, &["drug", "medication", "pharmac"]),
    (Family::Atomic, &["atomic", "atom", "isotope"]),
    (Family::LinearAlgebra, &["linear algebra", "matrix", "vector", "eigen"]),
];

impl Family {
    /// Keyword sniffing of gloss text, checked in table order.
    pub fn sniff(gloss: &str) -> Self {
        first_rule(&FAMILY_RULES, gloss).unwrap_or(Family::General)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theorem => "theorem",
            Self::Formula => "formula",
            Self::Metabolite => "metabolite",
            Self::Drug => "drug",
            Self::Atomic => "atomic",
            Self::LinearAlgebra => "linear_algebra",
            Self::General => "general",
        }
    }
}

/// Where a taxon's value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonType {
    /// The raw entry (the keyword hit the key).
    Entry,
    Synonym,
    Gloss,
}

impl TaxonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Synonym => "synonym",
            Self::Gloss => "gloss",
        }
    }
}

impl From<MatchField> for TaxonType {
    fn from(field: MatchField) -> Self {
        match field {
            MatchField::Key => Self::Entry,
            MatchField::Synonym => Self::Synonym,
            MatchField::Gloss => Self::Gloss,
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Kingdom, Family, TaxonType);

/// Synthetic classification of one dictionary match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    pub kingdom: Kingdom,
    pub phylum: String,
    pub family: Family,
    pub order: String,
    pub variable: String,
    #[serde(rename = "type")]
    pub kind: TaxonType,
    pub value: String,
}

impl Taxon {
    /// Classify a match. Pure function of the match.
    pub fn from_match(m: &Match) -> Self {
        let entry = m.entry();
        let gloss = match m.field {
            MatchField::Gloss => m.detail.clone(),
            _ => entry.gloss_text(),
        };
        let value = match m.field {
            MatchField::Key => entry.raw_text(),
            MatchField::Synonym | MatchField::Gloss => m.detail.clone(),
        };

        Self {
            kingdom: Kingdom::from_stem(&m.stem),
            phylum: m.stem.clone(),
            family: Family::sniff(&gloss),
            order: extract_order(&gloss),
            variable: normalize_variable(&m.entry_key),
            kind: m.field.into(),
            value,
        }
    }

    /// Value at a taxonomy depth: 1 kingdom, 2 phylum, 3 family, 4 order, 5 variable.
    pub fn level(&self, depth: u8) -> Option<&str> {
        match depth {
            1 => Some(self.kingdom.as_str()),
            2 => Some(&self.phylum),
            3 => Some(self.family.as_str()),
            4 => Some(&self.order),
            5 => Some(&self.variable),
            _ => None,
        }
    }
}

/// Lowercase, collapse non-alphanumeric runs to `_`, trim underscores.
pub fn normalize_variable(key: &str) -> String {
    NON_ALNUM_RUN
        .replace_all(&key.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// First formula-like span in the gloss, else a truncated snippet.
pub fn extract_order(gloss: &str) -> String {
    if let Some(m) = FORMULA.find(gloss) {
        return m.as_str().trim().to_string();
    }
    snippet(gloss, ORDER_SNIPPET_CHARS)
}

/// Truncate to `max_chars` on a char boundary, appending `...` when cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_match(stem: &str, key: &str, value: serde_json::Value, field: MatchField, detail: &str) -> Match {
        Match {
            keyword: key.to_string(),
            file: format!("{stem}.json"),
            stem: stem.to_string(),
            entry_key: key.to_string(),
            entry_value: value,
            field,
            detail: detail.to_string(),
        }
    }

    #[test]
    fn test_kingdom_lookup() {
        assert_eq!(Kingdom::from_stem("chemistry"), Kingdom::Science);
        assert_eq!(Kingdom::from_stem("Linear_Algebra"), Kingdom::Math);
        assert_eq!(Kingdom::from_stem("python_snippets"), Kingdom::Code);
        assert_eq!(Kingdom::from_stem("glossary"), Kingdom::Definitions);
        assert_eq!(Kingdom::from_stem("history"), Kingdom::Other);
        assert_eq!(Kingdom::from_stem("rust-crates"), Kingdom::Code);
    }

    #[test]
    fn test_kingdom_needles_start_words() {
        assert_eq!(Kingdom::from_stem("therapies"), Kingdom::Other);
        assert_eq!(Kingdom::from_stem("trust_law"), Kingdom::Other);
        assert_eq!(Kingdom::from_stem("drug_therapies"), Kingdom::Science);
    }

    #[test]
    fn test_family_order_of_checks() {
        assert_eq!(Family::sniff("A theorem about the formula"), Family::Theorem);
        assert_eq!(Family::sniff("the quadratic formula"), Family::Formula);
        assert_eq!(Family::sniff("a metabolite of glucose"), Family::Metabolite);
        assert_eq!(Family::sniff("a drug used for pain"), Family::Drug);
        assert_eq!(Family::sniff("the atomic number"), Family::Atomic);
        assert_eq!(Family::sniff("a square matrix"), Family::LinearAlgebra);
        assert_eq!(Family::sniff("a kind of bird"), Family::General);
    }

    #[test]
    fn test_family_needles_start_words() {
        assert_eq!(Family::sniff("the study of human anatomy"), Family::General);
        assert_eq!(Family::sniff("bonds between atoms"), Family::Atomic);
        assert_eq!(Family::sniff("a subatomic particle"), Family::General);
        assert_eq!(Family::sniff("taught in linear_algebra courses"), Family::LinearAlgebra);
        assert_eq!(Family::sniff("the eigenvalues of A"), Family::LinearAlgebra);
    }

    #[test]
    fn test_family_serializes_snake_case() {
        let s = serde_json::to_string(&Family::LinearAlgebra).unwrap();
        assert_eq!(s, "\"linear_algebra\"");
        assert_eq!(Family::LinearAlgebra.to_string(), "linear_algebra");
    }

    #[test]
    fn test_normalize_variable() {
        assert_eq!(normalize_variable("Electron Configuration"), "electron_configuration");
        assert_eq!(normalize_variable("  --Pi!  "), "pi");
        assert_eq!(normalize_variable("H2O"), "h2o");
    }

    #[test]
    fn test_order_prefers_formula() {
        assert_eq!(extract_order("energy is E = mc^2 in relativity"), "E = mc^2");
        assert_eq!(extract_order("holds when a <= b"), "a <= b");
    }

    #[test]
    fn test_order_snippet_fallback() {
        let long = "word ".repeat(30);
        let order = extract_order(&long);
        assert!(order.ends_with("..."));
        assert!(order.chars().count() <= ORDER_SNIPPET_CHARS + 3);
        assert_eq!(extract_order("short gloss"), "short gloss");
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        assert_eq!(snippet("ααααα", 3), "ααα...");
    }

    #[test]
    fn test_taxon_from_key_match() {
        let m = make_match(
            "chemistry",
            "electron",
            json!("a subatomic particle with atomic charge"),
            MatchField::Key,
            "",
        );
        let t = Taxon::from_match(&m);
        assert_eq!(t.kingdom, Kingdom::Science);
        assert_eq!(t.phylum, "chemistry");
        assert_eq!(t.family, Family::Atomic);
        assert_eq!(t.variable, "electron");
        assert_eq!(t.kind, TaxonType::Entry);
        assert_eq!(t.value, "a subatomic particle with atomic charge");
    }

    #[test]
    fn test_taxon_from_synonym_match() {
        let m = make_match(
            "math",
            "slope",
            json!({"gloss": "rate of change", "synonyms": ["gradient", "incline"]}),
            MatchField::Synonym,
            "gradient, incline",
        );
        let t = Taxon::from_match(&m);
        assert_eq!(t.kind, TaxonType::Synonym);
        assert_eq!(t.value, "gradient, incline");
        assert_eq!(t.order, "rate of change");
    }

    #[test]
    fn test_taxon_serializes_type_field() {
        let m = make_match("math", "pi", json!("ratio"), MatchField::Key, "");
        let v = serde_json::to_value(Taxon::from_match(&m)).unwrap();
        assert_eq!(v["type"], "entry");
        assert_eq!(v["kingdom"], "math");
        assert_eq!(v["family"], "general");
    }

    #[test]
    fn test_levels() {
        let m = make_match("math", "pi", json!("ratio"), MatchField::Key, "");
        let t = Taxon::from_match(&m);
        assert_eq!(t.level(1), Some("math"));
        assert_eq!(t.level(2), Some("math"));
        assert_eq!(t.level(5), Some("pi"));
        assert_eq!(t.level(0), None);
    }
}
