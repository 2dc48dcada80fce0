//! Data-directory operations shared by the CLI, the REPL and the MCP server.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nerve_core::{
    Analysis, DictionarySet, Session, SessionItem, SessionSummary, Settings, Variation, analyze,
    conjecture, generate_variations, render_summary,
};
use nerve_store::{SessionStore, SettingsStore, load_dictionaries};
use rand::Rng;

pub struct Workspace {
    base: PathBuf,
    dictionaries: DictionarySet,
    sessions: SessionStore,
    settings: SettingsStore,
}

impl Workspace {
    /// Load every dictionary under `base` and open its session directory.
    pub fn open(base: &Path) -> Result<Self> {
        let report = load_dictionaries(base)
            .with_context(|| format!("failed to load dictionaries from {}", base.display()))?;
        if report.dictionaries.is_empty() {
            tracing::warn!("no dictionaries found in {}", base.display());
        }
        let sessions = SessionStore::open(base).context("failed to open session store")?;
        Ok(Self {
            base: base.to_path_buf(),
            dictionaries: report.dictionaries,
            sessions,
            settings: SettingsStore::new(base),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn dictionaries(&self) -> &DictionarySet {
        &self.dictionaries
    }

    pub fn settings(&self) -> Result<Settings> {
        self.settings.load().context("failed to load settings")
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<Settings> {
        self.settings
            .set(key, value)
            .with_context(|| format!("failed to set {key}"))
    }

    pub fn toggle_setting(&self, key: &str) -> Result<bool> {
        self.settings
            .toggle(key)
            .with_context(|| format!("failed to toggle {key}"))
    }

    pub fn analyze(&self, prompt: &str) -> Result<Analysis> {
        let settings = self.settings()?;
        Ok(analyze(prompt, &self.dictionaries, settings.max_keywords))
    }

    /// Rendered summary of an analysis under the current settings.
    pub fn summarize(&self, analysis: &Analysis, rng: &mut impl Rng) -> Result<String> {
        let settings = self.settings()?;
        Ok(render_summary(&analysis.ranked(), &settings, rng))
    }

    /// Variations over an analysis; `steps` falls back to the configured default.
    pub fn variations(
        &self,
        analysis: &Analysis,
        steps: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Vec<Variation>> {
        let settings = self.settings()?;
        let steps = steps.unwrap_or(settings.steps);
        Ok(generate_variations(analysis, steps, &settings, rng))
    }

    pub fn conjecture_for_prompt(&self, prompt: &str) -> Result<String> {
        Ok(conjecture(&self.analyze(prompt)?.ranked()))
    }

    pub fn conjecture_for_session(&self, id: &str) -> Result<String> {
        Ok(conjecture(&self.load_session(id)?.ranked_items()))
    }

    pub fn new_session(&self, prompt: &str, id: Option<&str>) -> Result<Session> {
        let analysis = self.analyze(prompt)?;
        self.sessions
            .create(analysis, id, self.dictionaries.stems())
            .context("failed to create session")
    }

    pub fn load_session(&self, id: &str) -> Result<Session> {
        self.sessions
            .load(id)
            .with_context(|| format!("failed to load session {id}"))
    }

    /// First `n` unexplored items with their positions.
    pub fn top(&self, id: &str, n: usize) -> Result<Vec<(usize, SessionItem)>> {
        let session = self.load_session(id)?;
        Ok(session
            .top(n)
            .into_iter()
            .map(|(i, item)| (i, item.clone()))
            .collect())
    }

    pub fn explore(&self, id: &str, index: usize) -> Result<SessionItem> {
        self.sessions
            .mark_explored(id, index)
            .with_context(|| format!("failed to mark item {index} of session {id}"))
    }

    pub fn expand(&self, id: &str, variable: &str) -> Result<Vec<SessionItem>> {
        self.sessions
            .expand(id, variable)
            .with_context(|| format!("failed to expand {variable} in session {id}"))
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.sessions.list().context("failed to list sessions")
    }
}
