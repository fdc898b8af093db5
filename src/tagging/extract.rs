// Keyword extraction — frequency ranking over normalized tokens.
//
// No TF-IDF, no embeddings: a plain frequency count with a stable
// tie-break (first-seen order wins among equal counts), so the same text
// always produces the same keyword list. The bootstrap aggregates these
// per-document lists with the same ranking.

use std::collections::HashMap;

use super::normalize::normalize;

/// Rank words by descending frequency.
///
/// Ties keep first-seen order: the sort is stable and the counts vector
/// is built in encounter order. Returns every distinct word with its count.
pub fn rank_by_frequency<I, S>(words: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in words {
        let word = word.into();
        match index.get(&word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Extract up to `k` distinct keywords from free text, most frequent first.
///
/// Deterministic and duplicate-free; fewer than `k` distinct tokens
/// returns all of them. Empty output is a valid result, not an error.
pub fn extract_keywords(text: &str, k: usize) -> Vec<String> {
    rank_by_frequency(normalize(text))
        .into_iter()
        .take(k)
        .map(|(word, _)| word)
        .collect()
}
