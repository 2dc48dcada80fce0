use crate::score::Classified;

pub const NO_CONJECTURE: &str = "Not enough distinct matches for a conjecture";

/// Pair the strongest taxon with a partner from elsewhere in the taxonomy.
///
/// The partner is the best-ranked taxon from a different phylum; failing
/// that, one from a different family; failing that, any other variable.
pub fn pick_pair(ranked: &[Classified]) -> Option<(&Classified, &Classified)> {
    let (lead, rest) = ranked.split_first()?;
    let lt = &lead.taxon;
    let partner = rest
        .iter()
        .find(|c| c.taxon.phylum != lt.phylum)
        .or_else(|| rest.iter().find(|c| c.taxon.family != lt.family))
        .or_else(|| rest.iter().find(|c| c.taxon.variable != lt.variable))?;
    Some((lead, partner))
}

/// A one-sentence hypothesis linking two classified taxa.
pub fn conjecture(ranked: &[Classified]) -> String {
    let Some((a, b)) = pick_pair(ranked) else {
        return NO_CONJECTURE.to_string();
    };
    let (ta, tb) = (&a.taxon, &b.taxon);
    let link = if a.keyword == b.keyword {
        format!("both answer to '{}'", a.keyword)
    } else {
        format!("'{}' and '{}' were asked together", a.keyword, b.keyword)
    };
    format!(
        "Conjecture: if {} ({} in {}) holds, then {} ({} in {}) may follow, since {}.",
        ta.variable.replace('_', " "),
        ta.family,
        ta.phylum,
        tb.variable.replace('_', " "),
        tb.family,
        tb.phylum,
        link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Family, Kingdom, Taxon, TaxonType};

    fn classified(keyword: &str, phylum: &str, family: Family, variable: &str) -> Classified {
        Classified {
            keyword: keyword.to_string(),
            taxon: Taxon {
                kingdom: Kingdom::Other,
                phylum: phylum.to_string(),
                family,
                order: String::new(),
                variable: variable.to_string(),
                kind: TaxonType::Entry,
                value: String::new(),
            },
            score: 1,
        }
    }

    #[test]
    fn test_prefers_other_phylum() {
        let ranked = vec![
            classified("atom", "chemistry", Family::Atomic, "atom"),
            classified("atom", "chemistry", Family::General, "atomic_mass"),
            classified("atom", "physics", Family::Atomic, "atomic_nucleus"),
        ];
        let (a, b) = pick_pair(&ranked).unwrap();
        assert_eq!(a.taxon.variable, "atom");
        assert_eq!(b.taxon.phylum, "physics");
    }

    #[test]
    fn test_falls_back_to_other_family() {
        let ranked = vec![
            classified("x", "math", Family::Theorem, "pythagoras"),
            classified("x", "math", Family::Theorem, "pythagoras"),
            classified("y", "math", Family::Formula, "quadratic"),
        ];
        let (_, b) = pick_pair(&ranked).unwrap();
        assert_eq!(b.taxon.variable, "quadratic");
    }

    #[test]
    fn test_sentence_mentions_both() {
        let ranked = vec![
            classified("drug", "pharmacology", Family::Drug, "aspirin"),
            classified("pain", "medicine", Family::General, "analgesic"),
        ];
        let text = conjecture(&ranked);
        assert!(text.starts_with("Conjecture: if aspirin (drug in pharmacology)"));
        assert!(text.contains("analgesic (general in medicine)"));
        assert!(text.contains("'drug' and 'pain'"));
    }

    #[test]
    fn test_not_enough_material() {
        assert_eq!(conjecture(&[]), NO_CONJECTURE);
        let single = vec![classified("pi", "math", Family::General, "pi")];
        assert_eq!(conjecture(&single), NO_CONJECTURE);
    }
}
