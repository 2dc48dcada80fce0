use serde::{Deserialize, Serialize};

use crate::constants::{
    SCORE_FAMILY, SCORE_GLOSS, SCORE_LENGTH_BUCKET, SCORE_LENGTH_CAP, SCORE_SYNONYM,
    SCORE_VARIABLE, SCORE_VARIABLE_MIN_LEN,
};
use crate::taxonomy::{Family, Taxon, TaxonType};

/// A taxon with the keyword that produced it and its heuristic score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    pub keyword: String,
    #[serde(flatten)]
    pub taxon: Taxon,
    pub score: u32,
}

impl Classified {
    pub fn new(keyword: &str, taxon: Taxon) -> Self {
        let score = score(&taxon);
        Self {
            keyword: keyword.to_string(),
            taxon,
            score,
        }
    }
}

/// Heuristic specificity score.
///
/// `3·[family ≠ general] + 2·[gloss] + 1·[synonym] + min(3, len(value)/50) + 1·[len(variable) > 3]`
pub fn score(taxon: &Taxon) -> u32 {
    let mut s = 0;
    if taxon.family != Family::General {
        s += SCORE_FAMILY;
    }
    match taxon.kind {
        TaxonType::Gloss => s += SCORE_GLOSS,
        TaxonType::Synonym => s += SCORE_SYNONYM,
        TaxonType::Entry => {}
    }
    let length_bonus = (taxon.value.chars().count() / SCORE_LENGTH_BUCKET) as u32;
    s += length_bonus.min(SCORE_LENGTH_CAP);
    if taxon.variable.chars().count() > SCORE_VARIABLE_MIN_LEN {
        s += SCORE_VARIABLE;
    }
    s
}

/// Stable sort, highest score first. Equal scores keep insertion order.
pub fn rank(items: &mut [Classified]) {
    items.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Kingdom;

    fn taxon(family: Family, kind: TaxonType, variable: &str, value_len: usize) -> Taxon {
        Taxon {
            kingdom: Kingdom::Other,
            phylum: "misc".to_string(),
            family,
            order: String::new(),
            variable: variable.to_string(),
            kind,
            value: "x".repeat(value_len),
        }
    }

    #[test]
    fn test_minimum_score() {
        assert_eq!(score(&taxon(Family::General, TaxonType::Entry, "pi", 10)), 0);
    }

    #[test]
    fn test_each_term() {
        assert_eq!(score(&taxon(Family::Atomic, TaxonType::Entry, "pi", 0)), 3);
        assert_eq!(score(&taxon(Family::General, TaxonType::Gloss, "pi", 0)), 2);
        assert_eq!(score(&taxon(Family::General, TaxonType::Synonym, "pi", 0)), 1);
        assert_eq!(score(&taxon(Family::General, TaxonType::Entry, "pi", 120)), 2);
        assert_eq!(score(&taxon(Family::General, TaxonType::Entry, "atom", 0)), 1);
    }

    #[test]
    fn test_length_bonus_capped() {
        assert_eq!(score(&taxon(Family::General, TaxonType::Entry, "pi", 1000)), 3);
    }

    #[test]
    fn test_variable_boundary() {
        // exactly three characters does not qualify
        assert_eq!(score(&taxon(Family::General, TaxonType::Entry, "ion", 0)), 0);
    }

    #[test]
    fn test_maximum_score() {
        assert_eq!(score(&taxon(Family::Drug, TaxonType::Gloss, "aspirin", 400)), 9);
    }

    #[test]
    fn test_rank_is_stable() {
        let mut items = vec![
            Classified::new("a", taxon(Family::General, TaxonType::Entry, "first", 0)),
            Classified::new("b", taxon(Family::Drug, TaxonType::Entry, "pi", 0)),
            Classified::new("c", taxon(Family::General, TaxonType::Entry, "second", 0)),
        ];
        rank(&mut items);
        let order: Vec<&str> = items.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_classified_flattens_taxon() {
        let c = Classified::new("pi", taxon(Family::General, TaxonType::Gloss, "pi", 0));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["keyword"], "pi");
        assert_eq!(v["type"], "gloss");
        assert_eq!(v["score"], 2);
        let back: Classified = serde_json::from_value(v).unwrap();
        assert_eq!(back, c);
    }
}
