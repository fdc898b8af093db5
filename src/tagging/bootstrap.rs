// Topic bootstrap — one-time taxonomy seeding from the stored corpus.
//
// Runs at startup. When no topics exist yet, derives an initial topic set
// from every document's keywords and back-assigns topic ids. Idempotent:
// the count guard means it never runs twice and never overwrites an
// existing taxonomy. Best-effort: any failure is logged and swallowed so
// startup proceeds and the store stays usable.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::extract::{extract_keywords, rank_by_frequency};
use super::matcher::matching_topics;
use crate::store::models::Topic;
use crate::store::Store;

/// Keywords extracted per document, both for aggregation and re-assignment.
const DOC_KEYWORDS: usize = 10;
/// Corpus-wide candidate pool size.
const CANDIDATE_POOL: usize = 50;
/// How many of the pool become topics.
const SEEDED_TOPICS: usize = 30;
/// A document carries at most this many topic ids.
const MAX_TOPICS_PER_DOC: usize = 3;

/// Seed the taxonomy if the topic collection is empty. Never fails —
/// errors are absorbed here so the caller's startup continues.
pub async fn bootstrap_if_empty(store: &Arc<dyn Store>) {
    if let Err(e) = run(store).await {
        warn!(error = %e, "Topic bootstrap failed; continuing without seeded topics");
    }
}

async fn run(store: &Arc<dyn Store>) -> Result<()> {
    let existing = store.count_topics().await?;
    if existing > 0 {
        info!(topics = existing, "Topics already exist, skipping bootstrap");
        return Ok(());
    }

    let documents = store.all_documents().await?;
    if documents.is_empty() {
        info!("No documents to derive topics from");
        return Ok(());
    }

    // Every document contributes its top keywords to one corpus-wide
    // frequency table.
    let mut corpus_keywords: Vec<String> = Vec::new();
    for doc in &documents {
        let text = super::document_text(&doc.title, &doc.content);
        corpus_keywords.extend(extract_keywords(&text, DOC_KEYWORDS));
    }

    let mut ranked = rank_by_frequency(corpus_keywords);
    ranked.truncate(CANDIDATE_POOL);

    // The strongest candidates become singleton-keyword topics with dense
    // ids in ranking order.
    let topics: Vec<Topic> = ranked
        .iter()
        .take(SEEDED_TOPICS)
        .enumerate()
        .map(|(i, (keyword, freq))| Topic {
            topic_id: i as i64,
            name: capitalize(keyword),
            keywords: vec![keyword.clone()],
            count: *freq as i64,
            representative_docs: vec![],
        })
        .collect();

    if topics.is_empty() {
        info!("Corpus produced no keywords; nothing to seed");
        return Ok(());
    }

    // Topics must be persisted before any document references them.
    store.insert_topics(&topics).await?;
    info!(count = topics.len(), "Seeded keyword topics from corpus");

    // Re-scan: give each document up to 3 matching topic ids. Documents
    // with no match keep whatever they had (typically empty lists).
    let mut assigned = 0;
    for doc in &documents {
        let text = super::document_text(&doc.title, &doc.content);
        let keywords = extract_keywords(&text, DOC_KEYWORDS);
        let matched = matching_topics(&keywords, &topics, MAX_TOPICS_PER_DOC);
        if matched.is_empty() {
            continue;
        }

        let names: Vec<String> = matched
            .iter()
            .filter_map(|id| topics.iter().find(|t| t.topic_id == *id))
            .filter_map(|t| t.keywords.first().cloned())
            .collect();

        store.set_document_topics(doc.id, &matched, &names).await?;
        assigned += 1;
    }

    info!(assigned, total = documents.len(), "Back-assigned topics to documents");
    Ok(())
}

/// Uppercase the first letter; keywords are already lowercase.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
