// Text normalization — the first stage of the tagging pipeline.
//
// Lowercase, strip everything that isn't an ASCII letter or whitespace,
// split, then drop stopwords and short tokens. Deliberately no stemming:
// "story" and "stories" are distinct tokens, which keeps the heuristic
// reproducible.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Common English function words that never make useful keywords.
/// Closed list — matched case-insensitively (input is lowercased first).
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "will", "would", "should", "could", "may", "might", "can", "this", "that", "these",
    "those", "it", "its", "they", "them", "their", "he", "she", "him", "her", "his", "i", "you",
    "we", "us", "my", "your", "our",
];

/// Tokens this short carry no topical signal.
const MIN_TOKEN_LEN: usize = 4;

fn non_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z\s]").expect("static pattern"))
}

/// Normalize free text into candidate keyword tokens.
///
/// Empty input, pure punctuation, and pure numbers all yield an empty
/// list — callers treat that as "nothing to tag", never as an error.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let letters_only = non_letters().replace_all(&lowered, "");

    letters_only
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}
