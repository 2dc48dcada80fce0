use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentence template family used by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Plain,
    /// Full `kingdom > phylum > family > order` lineage before the value.
    Taxonomic,
    /// `variable: value` with the value truncated.
    Brief,
}

impl RenderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Taxonomic => "taxonomic",
            Self::Brief => "brief",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "taxonomic" => Some(Self::Taxonomic),
            "brief" => Some(Self::Brief),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SettingsError {
    UnknownKey(String),
    InvalidValue { key: String, reason: String },
    NotToggle(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownKey(key) => write!(f, "unknown setting: {key}"),
            SettingsError::InvalidValue { key, reason } => {
                write!(f, "invalid value for {key}: {reason}")
            }
            SettingsError::NotToggle(key) => write!(f, "setting {key} is not a boolean"),
        }
    }
}

impl std::error::Error for SettingsError {}

pub const MAX_ANCHOR_LEVEL: u8 = 5;

/// Rendering and analysis settings. Missing keys take the defaults below;
/// unknown keys are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub style: RenderStyle,
    /// Render least specific first.
    pub reverse: bool,
    /// Taxonomy level prefixed to each sentence: 0 none, 1 kingdom ... 5 variable.
    pub anchor_level: u8,
    /// Probability of choosing an alternate sentence template.
    pub temperature: f64,
    /// Records rendered per summary or variation.
    pub verbosity: usize,
    /// Default number of variations.
    pub steps: usize,
    /// Keywords kept per fragment.
    pub max_keywords: usize,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style: RenderStyle::Plain,
            reverse: false,
            anchor_level: 0,
            temperature: 0.0,
            verbosity: 3,
            steps: 5,
            max_keywords: 8,
            extra: BTreeMap::new(),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, format!("expected a boolean, got '{value}'"))),
    }
}

fn parse_count(key: &str, value: &str, min: usize) -> Result<usize, SettingsError> {
    let n: usize = value
        .parse()
        .map_err(|_| invalid(key, format!("expected a whole number, got '{value}'")))?;
    if n < min {
        return Err(invalid(key, format!("must be at least {min}")));
    }
    Ok(n)
}

impl Settings {
    /// Names of the known keys, in display order.
    pub const KEYS: [&'static str; 7] = [
        "style",
        "reverse",
        "anchor_level",
        "temperature",
        "verbosity",
        "steps",
        "max_keywords",
    ];

    /// Set a key from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let value = value.trim();
        match key {
            "style" => {
                self.style = RenderStyle::parse(value).ok_or_else(|| {
                    invalid(key, format!("expected plain, taxonomic or brief, got '{value}'"))
                })?;
            }
            "reverse" => self.reverse = parse_bool(key, value)?,
            "anchor_level" => {
                let level = parse_count(key, value, 0)?;
                if level > MAX_ANCHOR_LEVEL as usize {
                    return Err(invalid(key, format!("must be at most {MAX_ANCHOR_LEVEL}")));
                }
                self.anchor_level = level as u8;
            }
            "temperature" => {
                let t: f64 = value
                    .parse()
                    .map_err(|_| invalid(key, format!("expected a number, got '{value}'")))?;
                if !(0.0..=1.0).contains(&t) {
                    return Err(invalid(key, "must be between 0 and 1"));
                }
                self.temperature = t;
            }
            "verbosity" => self.verbosity = parse_count(key, value, 1)?,
            "steps" => self.steps = parse_count(key, value, 0)?,
            "max_keywords" => self.max_keywords = parse_count(key, value, 1)?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Flip a boolean key and return its new value.
    pub fn toggle(&mut self, key: &str) -> Result<bool, SettingsError> {
        match key {
            "reverse" => {
                self.reverse = !self.reverse;
                Ok(self.reverse)
            }
            k if Self::KEYS.contains(&k) => Err(SettingsError::NotToggle(k.to_string())),
            k => Err(SettingsError::UnknownKey(k.to_string())),
        }
    }

    /// `key = value` lines for display.
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("style        = {}", self.style.as_str()),
            format!("reverse      = {}", self.reverse),
            format!("anchor_level = {}", self.anchor_level),
            format!("temperature  = {}", self.temperature),
            format!("verbosity    = {}", self.verbosity),
            format!("steps        = {}", self.steps),
            format!("max_keywords = {}", self.max_keywords),
        ];
        for (key, value) in &self.extra {
            lines.push(format!("{key} = {value}"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let s: Settings = serde_json::from_str(r#"{"style": "brief", "verbosity": 1}"#).unwrap();
        assert_eq!(s.style, RenderStyle::Brief);
        assert_eq!(s.verbosity, 1);
        assert_eq!(s.steps, 5);
        assert!(!s.reverse);
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let s: Settings = serde_json::from_str(r#"{"theme": "dark", "reverse": true}"#).unwrap();
        assert_eq!(s.extra.get("theme"), Some(&Value::from("dark")));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["reverse"], true);
    }

    #[test]
    fn test_set_typed_values() {
        let mut s = Settings::default();
        s.set("style", "Taxonomic").unwrap();
        s.set("reverse", "on").unwrap();
        s.set("anchor_level", "2").unwrap();
        s.set("temperature", "0.25").unwrap();
        s.set("steps", "0").unwrap();
        assert_eq!(s.style, RenderStyle::Taxonomic);
        assert!(s.reverse);
        assert_eq!(s.anchor_level, 2);
        assert_eq!(s.temperature, 0.25);
        assert_eq!(s.steps, 0);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut s = Settings::default();
        assert!(matches!(s.set("style", "loud"), Err(SettingsError::InvalidValue { .. })));
        assert!(matches!(s.set("anchor_level", "6"), Err(SettingsError::InvalidValue { .. })));
        assert!(matches!(s.set("temperature", "1.5"), Err(SettingsError::InvalidValue { .. })));
        assert!(matches!(s.set("verbosity", "0"), Err(SettingsError::InvalidValue { .. })));
        assert_eq!(
            s.set("colour", "red"),
            Err(SettingsError::UnknownKey("colour".to_string()))
        );
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_toggle() {
        let mut s = Settings::default();
        assert_eq!(s.toggle("reverse"), Ok(true));
        assert_eq!(s.toggle("reverse"), Ok(false));
        assert_eq!(s.toggle("style"), Err(SettingsError::NotToggle("style".to_string())));
        assert!(matches!(s.toggle("nope"), Err(SettingsError::UnknownKey(_))));
    }

    #[test]
    fn test_describe_lists_every_key() {
        let text = Settings::default().describe();
        for key in Settings::KEYS {
            assert!(text.contains(key), "missing {key}");
        }
    }
}
