use std::sync::LazyLock;

use regex::Regex;

static CLAUSE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[.!?;:,]+|\b(?:and|but|or|nor|yet|so|because|while|whereas|although|though|however|then)\b",
    )
    .unwrap()
});

/// Split a prompt into clause-like fragments on punctuation and conjunctions.
/// Fragments are trimmed; empty pieces are dropped.
pub fn fragment(prompt: &str) -> Vec<String> {
    CLAUSE_BREAK
        .split(prompt)
        .map(str::trim)
        .filter(|f| f.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}
