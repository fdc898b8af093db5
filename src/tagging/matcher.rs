// Topic matching — keyword-set intersection against the stored taxonomy.
//
// Matching is always case-insensitive: both sides are lowercased before
// comparison, on every path. (The alternative — matching stored casing
// verbatim — silently misses topics whose names were capitalized at
// creation time.)

use std::collections::HashSet;

use crate::store::models::Topic;

/// Display names shown for a match: the topic's first 3 keywords.
const DISPLAY_KEYWORDS: usize = 3;

/// Collect up to `limit` topic ids whose keyword set intersects the
/// candidate keywords, in the iteration order of `topics`.
///
/// No intersection at all yields an empty list — that's a valid outcome,
/// not an error.
pub fn matching_topics(keywords: &[String], topics: &[Topic], limit: usize) -> Vec<i64> {
    let candidates: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut matched = Vec::new();
    for topic in topics {
        if topic
            .keywords
            .iter()
            .any(|kw| candidates.contains(&kw.to_lowercase()))
        {
            matched.push(topic.topic_id);
            if matched.len() >= limit {
                break;
            }
        }
    }
    matched
}

/// Single-match variant: the first intersecting topic's id plus its first
/// 3 keywords as display names. When nothing matches, the input's own
/// first 3 keywords stand in — unmatched content still gets display names
/// derived from itself.
pub fn match_with_fallback(keywords: &[String], topics: &[Topic]) -> (Option<i64>, Vec<String>) {
    let candidates: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    for topic in topics {
        if topic
            .keywords
            .iter()
            .any(|kw| candidates.contains(&kw.to_lowercase()))
        {
            let display = topic
                .keywords
                .iter()
                .take(DISPLAY_KEYWORDS)
                .cloned()
                .collect();
            return (Some(topic.topic_id), display);
        }
    }

    let display = keywords.iter().take(DISPLAY_KEYWORDS).cloned().collect();
    (None, display)
}
