//! Taxonomic classification over static JSON term dictionaries.
//!
//! A prompt is split into fragments, keywords are matched against
//! heterogeneous dictionaries, and every match becomes a synthetic taxon
//! (kingdom / phylum / family / order / variable / type / value) that is
//! scored, ranked and rendered. Variations sweep the distinct variables
//! with a cosine phase; sessions freeze a ranked item list for exploration.
//!
//! Zero I/O. Loading and persistence live in `nerve-store`.

pub mod analysis;
pub mod conjecture;
pub mod constants;
pub mod dictionary;
pub mod fragment;
pub mod matcher;
pub mod phase;
pub mod render;
pub mod score;
pub mod session;
pub mod settings;
pub mod taxonomy;
pub mod time;
pub mod tokenizer;
pub mod variation;

pub use analysis::{Analysis, FragmentAnalysis, analyze, analyze_fragment};
pub use conjecture::{NO_CONJECTURE, conjecture};
pub use constants::NO_MATCHES;
pub use dictionary::{Dictionary, DictionarySet, Entry, Sense};
pub use fragment::fragment;
pub use matcher::{Match, MatchField, find_matches};
pub use phase::{StepPhase, sweep_indices};
pub use render::{render_sentence, render_summary};
pub use score::{Classified, score};
pub use session::{Session, SessionItem, SessionMeta, SessionSummary};
pub use settings::{RenderStyle, Settings, SettingsError};
pub use taxonomy::{Family, Kingdom, Taxon, TaxonType};
pub use tokenizer::{extract_keywords, fold, normalize, tokenize};
pub use variation::{Selection, Variation, format_variations, generate_variations};
