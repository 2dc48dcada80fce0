//! Exploration sessions over an analysis.
//!
//! A session freezes the scored items of one analysis so a user can walk
//! them over several invocations, marking items explored as they go.
//! Items are ordered by score once, at creation; later edits never reorder.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::score::{Classified, rank};
use crate::taxonomy::Taxon;

/// One scored taxon within a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionItem {
    #[serde(flatten)]
    pub taxon: Taxon,
    pub fragment: String,
    pub keywords: Vec<String>,
    pub keyword: String,
    pub score: u32,
    #[serde(default)]
    pub explored: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub prompt: String,
    #[serde(default)]
    pub dictionaries: Vec<String>,
    #[serde(default)]
    pub fragment_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created: String,
    pub meta: SessionMeta,
    pub result: Analysis,
    pub items: Vec<SessionItem>,
}

/// Listing row for a stored session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub created: String,
    pub prompt: String,
    pub items: usize,
    pub explored: usize,
}

impl Session {
    /// Flatten an analysis into score-ordered items.
    /// Ties keep fragment order, then within-fragment rank.
    pub fn from_analysis(
        id: &str,
        created: &str,
        analysis: Analysis,
        dictionaries: Vec<String>,
    ) -> Self {
        let mut items: Vec<SessionItem> = analysis
            .fragments
            .iter()
            .flat_map(|f| {
                f.taxa.iter().map(move |c| SessionItem {
                    taxon: c.taxon.clone(),
                    fragment: f.fragment.clone(),
                    keywords: f.keywords.clone(),
                    keyword: c.keyword.clone(),
                    score: c.score,
                    explored: false,
                })
            })
            .collect();
        items.sort_by(|a, b| b.score.cmp(&a.score));

        Self {
            id: id.to_string(),
            created: created.to_string(),
            meta: SessionMeta {
                prompt: analysis.prompt.clone(),
                dictionaries,
                fragment_count: analysis.fragments.len(),
            },
            result: analysis,
            items,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            created: self.created.clone(),
            prompt: self.meta.prompt.clone(),
            items: self.items.len(),
            explored: self.explored_count(),
        }
    }

    pub fn explored_count(&self) -> usize {
        self.items.iter().filter(|i| i.explored).count()
    }

    /// First `n` unexplored items, with their positions, in stored order.
    pub fn top(&self, n: usize) -> Vec<(usize, &SessionItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.explored)
            .take(n)
            .collect()
    }

    /// Mark the item at `index` explored. Position is unchanged.
    pub fn mark_explored(&mut self, index: usize) -> Option<&SessionItem> {
        let item = self.items.get_mut(index)?;
        item.explored = true;
        Some(item)
    }

    /// Mark every item with `variable` explored and return the related
    /// items: the variable's own items first, then items sharing phylum and
    /// family with any of them. Returns an empty list for an unknown
    /// variable and leaves the session untouched.
    pub fn expand_variable(&mut self, variable: &str) -> Vec<SessionItem> {
        let mut lineages: HashSet<(String, String)> = HashSet::new();
        let mut own = Vec::new();
        for item in self.items.iter_mut().filter(|i| i.taxon.variable == variable) {
            item.explored = true;
            lineages.insert((item.taxon.phylum.clone(), item.taxon.family.to_string()));
            own.push(item.clone());
        }
        if own.is_empty() {
            return own;
        }

        let related = self.items.iter().filter(|i| {
            i.taxon.variable != variable
                && lineages.contains(&(i.taxon.phylum.clone(), i.taxon.family.to_string()))
        });
        own.extend(related.cloned());
        own
    }

    /// Re-rank into a standalone list (does not mutate the session).
    pub fn ranked_items(&self) -> Vec<Classified> {
        let mut out: Vec<Classified> = self
            .items
            .iter()
            .map(|i| Classified {
                keyword: i.keyword.clone(),
                taxon: i.taxon.clone(),
                score: i.score,
            })
            .collect();
        rank(&mut out);
        out
    }
}
