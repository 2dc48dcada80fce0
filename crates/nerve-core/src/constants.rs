/// Literal rendered when a prompt produces no dictionary matches.
pub const NO_MATCHES: &str = "No matches found";

/// Characters of gloss kept as the `order` snippet when no formula is found.
pub const ORDER_SNIPPET_CHARS: usize = 60;

/// Characters of value kept by the `brief` render style.
pub const BRIEF_VALUE_CHARS: usize = 80;

/// Score weight: taxon has a specific (non-general) family.
pub const SCORE_FAMILY: u32 = 3;

/// Score weight: taxon value came from a gloss.
pub const SCORE_GLOSS: u32 = 2;

/// Score weight: taxon value came from a synonym list.
pub const SCORE_SYNONYM: u32 = 1;

/// Value length bucket size for the length bonus.
pub const SCORE_LENGTH_BUCKET: usize = 50;

/// Cap on the value length bonus.
pub const SCORE_LENGTH_CAP: u32 = 3;

/// Score weight: variable longer than `SCORE_VARIABLE_MIN_LEN` characters.
pub const SCORE_VARIABLE: u32 = 1;

/// Variable length (in characters) that must be exceeded for `SCORE_VARIABLE`.
pub const SCORE_VARIABLE_MIN_LEN: usize = 3;

/// Taxa returned when neither a direct nor a substring match exists for a variable.
pub const FALLBACK_TOP_N: usize = 3;

/// Keywords shorter than this are dropped by the extractor.
pub const MIN_KEYWORD_LEN: usize = 2;

/// English stopwords removed before keyword ranking.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "explain",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "out", "over", "own", "please", "same", "she", "should", "so", "some",
    "such", "tell", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your",
];
