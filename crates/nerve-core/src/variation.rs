use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::constants::{FALLBACK_TOP_N, NO_MATCHES};
use crate::phase::StepPhase;
use crate::render::render_summary;
use crate::score::Classified;
use crate::settings::Settings;

/// How a variable's taxa were found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Taxa whose variable equals the requested one.
    Direct,
    /// Taxa whose variable or value contains the requested one (or vice versa).
    Substring,
    /// Neither matched; the top-scored taxa stand in.
    Fallback,
}

/// One rendered variation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub step: usize,
    pub phase: f64,
    pub index: usize,
    pub variable: String,
    pub selection: Selection,
    pub text: String,
}

/// Taxa for a variable with substring and top-N fallbacks.
pub fn select_for_variable(ranked: &[Classified], variable: &str) -> (Vec<Classified>, Selection) {
    let direct: Vec<Classified> = ranked
        .iter()
        .filter(|c| c.taxon.variable == variable)
        .cloned()
        .collect();
    if !direct.is_empty() {
        return (direct, Selection::Direct);
    }

    let needle = variable.to_lowercase();
    if !needle.is_empty() {
        let partial: Vec<Classified> = ranked
            .iter()
            .filter(|c| {
                c.taxon.variable.contains(&needle)
                    || (!c.taxon.variable.is_empty() && needle.contains(&c.taxon.variable))
                    || c.taxon.value.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        if !partial.is_empty() {
            return (partial, Selection::Substring);
        }
    }

    let top = ranked.iter().take(FALLBACK_TOP_N).cloned().collect();
    (top, Selection::Fallback)
}

/// Generate `steps` renderings, each foregrounding the variable chosen by
/// the cosine phase sweep over the analysis' distinct variables.
pub fn generate_variations(
    analysis: &Analysis,
    steps: usize,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Vec<Variation> {
    let ranked = analysis.ranked();
    let variables = analysis.variables();
    if ranked.is_empty() || variables.is_empty() {
        return Vec::new();
    }

    (0..steps)
        .map(|step| {
            let phase = StepPhase::from_step(step, steps);
            let index = phase.index(variables.len());
            let variable = variables[index].clone();
            let (selected, selection) = select_for_variable(&ranked, &variable);
            Variation {
                step,
                phase: phase.theta,
                index,
                text: render_summary(&selected, settings, rng),
                variable,
                selection,
            }
        })
        .collect()
}

/// Numbered lines for display. The no-match literal only stands in when the
/// analysis itself matched nothing; zero requested steps print nothing.
pub fn format_variations(analysis: &Analysis, variations: &[Variation]) -> String {
    if analysis.is_empty() {
        return NO_MATCHES.to_string();
    }
    variations
        .iter()
        .map(|v| format!("{}. [{}] {}", v.step + 1, v.variable, v.text))
        .collect::<Vec<_>>()
        .join("\n")
}
