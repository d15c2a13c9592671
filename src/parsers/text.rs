use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w[\w'-]*\w\b|\b\w\b").expect("word regex is valid"));

/// Built-in English stop words
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is",
    "isn't", "it", "it's", "its", "itself", "just", "let's", "may", "me", "more", "most", "must",
    "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so", "some",
    "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "us", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Stop-word set plus minimum token length used while counting words
#[derive(Debug, Clone)]
pub struct TokenFilter {
    stop_words: HashSet<String>,
    min_length: usize,
}

impl TokenFilter {
    pub fn new(min_length: usize, extra_stop_words: &[String]) -> Self {
        let mut stop_words: HashSet<String> =
            ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect();
        stop_words.extend(extra_stop_words.iter().map(|w| w.to_lowercase()));
        Self {
            stop_words,
            min_length,
        }
    }

    fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_length && !self.stop_words.contains(token)
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self::new(3, &[])
    }
}

/// Collapse every whitespace run to one space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text form the content hash is computed over
pub fn fold_for_hash(text: &str) -> String {
    normalize_whitespace(&text.to_lowercase())
}

/// Lowercased tokens in document order, stop words and short tokens removed
pub fn tokenize(text: &str, filter: &TokenFilter) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| filter.keeps(t))
        .map(|t| t.to_string())
        .collect()
}

/// Contiguous `n`-token windows joined with a single space
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Frequency table of the given items
pub fn count<I>(items: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = String>,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Unigram, bigram and trigram counts for one body of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgramCounts {
    pub words: HashMap<String, usize>,
    pub bigrams: HashMap<String, usize>,
    pub trigrams: HashMap<String, usize>,
    /// Number of tokens that survived filtering
    pub token_count: usize,
}

impl NgramCounts {
    pub fn from_text(text: &str, filter: &TokenFilter) -> Self {
        let tokens = tokenize(text, filter);
        Self {
            bigrams: count(ngrams(&tokens, 2)),
            trigrams: count(ngrams(&tokens, 3)),
            token_count: tokens.len(),
            words: count(tokens),
        }
    }
}
