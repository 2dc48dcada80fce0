use rand::Rng;

use crate::constants::{BRIEF_VALUE_CHARS, NO_MATCHES};
use crate::score::Classified;
use crate::settings::{RenderStyle, Settings};
use crate::taxonomy::{TaxonType, snippet};

// Template slots: {v} variable, {p} phylum, {f} family, {o} order, {x} value.
// The first variant of each list is the deterministic default.
const ENTRY_TEMPLATES: &[&str] = &[
    "In {p}, {v} refers to {x}.",
    "{V} ({p}) is recorded as {x}.",
    "Within {p}, {v} reads: {x}.",
];
const SYNONYM_TEMPLATES: &[&str] = &[
    "{V} is also known as {x}.",
    "In {p}, {v} goes by {x}.",
    "Other names for {v}: {x}.",
];
const GLOSS_TEMPLATES: &[&str] = &[
    "{V} ({p}) is described as {x}.",
    "A {f} entry in {p}, {v} means {x}.",
    "{V}: {x} ({p}).",
];

fn templates_for(kind: TaxonType) -> &'static [&'static str] {
    match kind {
        TaxonType::Entry => ENTRY_TEMPLATES,
        TaxonType::Synonym => SYNONYM_TEMPLATES,
        TaxonType::Gloss => GLOSS_TEMPLATES,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_variable(variable: &str) -> String {
    variable.replace('_', " ")
}

/// Pick a template variant: the default unless a `temperature`-weighted
/// draw says otherwise.
fn pick_variant(count: usize, temperature: f64, rng: &mut impl Rng) -> usize {
    if count <= 1 || temperature <= 0.0 {
        return 0;
    }
    if rng.random::<f64>() < temperature {
        rng.random_range(0..count)
    } else {
        0
    }
}

fn fill(template: &str, c: &Classified) -> String {
    let t = &c.taxon;
    let variable = display_variable(&t.variable);
    let value = t.value.trim().trim_end_matches('.');
    template
        .replace("{V}", &capitalize(&variable))
        .replace("{v}", &variable)
        .replace("{p}", &t.phylum)
        .replace("{f}", t.family.as_str())
        .replace("{o}", &t.order)
        .replace("{x}", value)
}

/// Render one classified taxon as a sentence in the configured style.
pub fn render_sentence(c: &Classified, settings: &Settings, rng: &mut impl Rng) -> String {
    let t = &c.taxon;
    let body = match settings.style {
        RenderStyle::Plain => {
            let templates = templates_for(t.kind);
            let idx = pick_variant(templates.len(), settings.temperature, rng);
            fill(templates[idx], c)
        }
        RenderStyle::Taxonomic => format!(
            "{} > {} > {} > {}: {} = {}",
            t.kingdom,
            t.phylum,
            t.family,
            t.order,
            t.variable,
            t.value.trim()
        ),
        RenderStyle::Brief => format!(
            "{}: {}",
            display_variable(&t.variable),
            snippet(&t.value, BRIEF_VALUE_CHARS)
        ),
    };

    match t.level(settings.anchor_level) {
        Some(anchor) => format!("[{anchor}] {body}"),
        None => body,
    }
}

/// Render the top `settings.verbosity` records as a paragraph.
/// `settings.reverse` lists them least specific first.
pub fn render_summary(ranked: &[Classified], settings: &Settings, rng: &mut impl Rng) -> String {
    if ranked.is_empty() {
        return NO_MATCHES.to_string();
    }
    let take = settings.verbosity.max(1).min(ranked.len());
    let mut sentences: Vec<String> = ranked[..take]
        .iter()
        .map(|c| render_sentence(c, settings, rng))
        .collect();
    if settings.reverse {
        sentences.reverse();
    }
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Family, Kingdom, Taxon};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn classified(variable: &str, kind: TaxonType, value: &str, score: u32) -> Classified {
        Classified {
            keyword: variable.to_string(),
            taxon: Taxon {
                kingdom: Kingdom::Science,
                phylum: "chemistry".to_string(),
                family: Family::Atomic,
                order: "shells".to_string(),
                variable: variable.to_string(),
                kind,
                value: value.to_string(),
            },
            score,
        }
    }

    #[test]
    fn test_plain_templates() {
        let s = Settings::default();
        let mut r = rng();
        assert_eq!(
            render_sentence(&classified("electron", TaxonType::Entry, "a lepton.", 1), &s, &mut r),
            "In chemistry, electron refers to a lepton."
        );
        assert_eq!(
            render_sentence(&classified("valence", TaxonType::Synonym, "valency", 1), &s, &mut r),
            "Valence is also known as valency."
        );
        assert_eq!(
            render_sentence(
                &classified("atomic_number", TaxonType::Gloss, "count of protons", 1),
                &s,
                &mut r
            ),
            "Atomic number (chemistry) is described as count of protons."
        );
    }

    #[test]
    fn test_taxonomic_style() {
        let s = Settings {
            style: RenderStyle::Taxonomic,
            ..Settings::default()
        };
        let out = render_sentence(&classified("ion", TaxonType::Entry, "charged", 1), &s, &mut rng());
        assert_eq!(out, "science > chemistry > atomic > shells: ion = charged");
    }

    #[test]
    fn test_brief_style_truncates() {
        let s = Settings {
            style: RenderStyle::Brief,
            ..Settings::default()
        };
        let long = "z".repeat(200);
        let out = render_sentence(&classified("ion", TaxonType::Entry, &long, 1), &s, &mut rng());
        assert!(out.starts_with("ion: "));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_anchor_prefix() {
        let s = Settings {
            anchor_level: 2,
            ..Settings::default()
        };
        let out = render_sentence(&classified("ion", TaxonType::Entry, "charged", 1), &s, &mut rng());
        assert!(out.starts_with("[chemistry] "));
    }

    #[test]
    fn test_zero_temperature_is_deterministic() {
        let s = Settings::default();
        let c = classified("ion", TaxonType::Gloss, "charged", 1);
        let a = render_sentence(&c, &s, &mut SmallRng::seed_from_u64(1));
        let b = render_sentence(&c, &s, &mut SmallRng::seed_from_u64(999));
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_temperature_uses_known_templates() {
        let s = Settings {
            temperature: 1.0,
            ..Settings::default()
        };
        let c = classified("ion", TaxonType::Gloss, "charged", 1);
        let expected: Vec<String> = GLOSS_TEMPLATES.iter().map(|t| fill(t, &c)).collect();
        let mut r = rng();
        for _ in 0..20 {
            let out = render_sentence(&c, &s, &mut r);
            assert!(expected.contains(&out), "unexpected rendering: {out}");
        }
    }

    #[test]
    fn test_summary_verbosity_and_reverse() {
        let ranked = vec![
            classified("alpha", TaxonType::Entry, "first", 3),
            classified("beta", TaxonType::Entry, "second", 2),
            classified("gamma", TaxonType::Entry, "third", 1),
        ];
        let s = Settings {
            verbosity: 2,
            ..Settings::default()
        };
        let out = render_summary(&ranked, &s, &mut rng());
        assert!(out.contains("alpha") && out.contains("beta") && !out.contains("gamma"));
        assert!(out.find("alpha") < out.find("beta"));

        let rev = Settings {
            verbosity: 2,
            reverse: true,
            ..Settings::default()
        };
        let out = render_summary(&ranked, &rev, &mut rng());
        assert!(out.find("beta") < out.find("alpha"));
    }

    #[test]
    fn test_summary_no_matches() {
        assert_eq!(render_summary(&[], &Settings::default(), &mut rng()), NO_MATCHES);
    }
}
