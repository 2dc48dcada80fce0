use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dictionary::DictionarySet;
use crate::fragment::fragment;
use crate::matcher::find_matches;
use crate::score::{Classified, rank};
use crate::taxonomy::{Taxon, TaxonType};
use crate::tokenizer::extract_keywords;

/// Classification results for one fragment of the prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentAnalysis {
    pub fragment: String,
    pub keywords: Vec<String>,
    /// Ranked by score, highest first.
    pub taxa: Vec<Classified>,
}

/// Full taxonomy analysis of a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub prompt: String,
    pub fragments: Vec<FragmentAnalysis>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.taxa.is_empty())
    }

    pub fn taxon_count(&self) -> usize {
        self.fragments.iter().map(|f| f.taxa.len()).sum()
    }

    /// Every taxon across fragments, deduplicated on (phylum, variable, type)
    /// and stably ranked by score.
    pub fn ranked(&self) -> Vec<Classified> {
        let mut seen: HashSet<(String, String, TaxonType)> = HashSet::new();
        let mut all: Vec<Classified> = self
            .fragments
            .iter()
            .flat_map(|f| f.taxa.iter())
            .filter(|c| seen.insert(dedup_key(&c.taxon)))
            .cloned()
            .collect();
        rank(&mut all);
        all
    }

    /// Distinct variables in ranked order.
    pub fn variables(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.ranked()
            .into_iter()
            .map(|c| c.taxon.variable)
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

fn dedup_key(t: &Taxon) -> (String, String, TaxonType) {
    (t.phylum.clone(), t.variable.clone(), t.kind)
}

/// Classify a single fragment: keywords, matches, taxa, scores.
pub fn analyze_fragment(
    text: &str,
    dictionaries: &DictionarySet,
    max_keywords: usize,
) -> FragmentAnalysis {
    let keywords = extract_keywords(text, max_keywords);
    let matches = find_matches(&keywords, dictionaries);

    let mut seen = HashSet::new();
    let mut taxa: Vec<Classified> = matches
        .iter()
        .map(|m| Classified::new(&m.keyword, Taxon::from_match(m)))
        .filter(|c| seen.insert(dedup_key(&c.taxon)))
        .collect();
    rank(&mut taxa);

    FragmentAnalysis {
        fragment: text.to_string(),
        keywords,
        taxa,
    }
}

/// Fragment the prompt and classify each fragment against the dictionaries.
pub fn analyze(prompt: &str, dictionaries: &DictionarySet, max_keywords: usize) -> Analysis {
    let fragments = fragment(prompt)
        .iter()
        .map(|f| analyze_fragment(f, dictionaries, max_keywords))
        .collect();

    Analysis {
        prompt: prompt.to_string(),
        fragments,
    }
}
