// Full-corpus regeneration — replace the taxonomy and the documents with
// the model's view of the CSV source.
//
// Ordering is the contract here: the model must fit successfully BEFORE
// anything is cleared. A model failure leaves the store exactly as it was.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use super::traits::{TopicModel, NOISE_TOPIC};
use crate::ingest::StoryRow;
use crate::store::models::{NewDocument, Topic};
use crate::store::Store;

/// Keywords kept per topic in the stored taxonomy.
const TOPIC_KEYWORDS: usize = 10;
/// Keywords shown as a document's display names.
const DISPLAY_KEYWORDS: usize = 3;

/// What a regeneration did, for reporting back to the caller.
#[derive(Debug, Clone, Copy)]
pub struct RegenerationSummary {
    pub topics_count: usize,
    pub documents_processed: usize,
}

/// Fit the model over the CSV corpus, then rebuild both collections from
/// scratch. Full-replace semantics — the corpus is the source of truth,
/// not an incremental update.
pub async fn regenerate(
    store: &Arc<dyn Store>,
    model: &dyn TopicModel,
    rows: &[StoryRow],
) -> Result<RegenerationSummary> {
    let corpus: Vec<String> = rows.iter().map(|row| row.story.clone()).collect();

    let (assignments, _probabilities) = model
        .fit_transform(&corpus)
        .await
        .context("Topic model failed to fit the corpus")?;
    if assignments.len() != rows.len() {
        anyhow::bail!(
            "Topic model returned {} assignments for {} documents",
            assignments.len(),
            rows.len()
        );
    }

    // Build the new taxonomy from the fitted model, skipping the noise
    // topic — it means "no topic", not a topic of its own.
    let mut topics = Vec::new();
    for summary in model.get_topic_info().await? {
        if summary.topic_id == NOISE_TOPIC {
            continue;
        }
        let ranked = model.get_topic(summary.topic_id).await?;
        topics.push(Topic {
            topic_id: summary.topic_id,
            name: summary.name,
            keywords: ranked
                .iter()
                .take(TOPIC_KEYWORDS)
                .map(|(word, _)| word.clone())
                .collect(),
            count: summary.count,
            representative_docs: vec![],
        });
    }

    // The model succeeded — only now is clearing the store safe.
    store.delete_all_topics().await?;
    if !topics.is_empty() {
        store.insert_topics(&topics).await?;
    }

    store.delete_all_documents().await?;

    let mut documents = Vec::with_capacity(rows.len());
    for (row, &assigned) in rows.iter().zip(assignments.iter()) {
        let topic_names: Vec<String> = if assigned == NOISE_TOPIC {
            vec![]
        } else {
            model
                .get_topic(assigned)
                .await?
                .iter()
                .take(DISPLAY_KEYWORDS)
                .map(|(word, _)| word.clone())
                .collect()
        };

        documents.push(NewDocument {
            story_id: row.id,
            title: row.title.clone(),
            content: row.story.clone(),
            genre: row.genre.clone(),
            topics: if assigned == NOISE_TOPIC {
                vec![]
            } else {
                vec![assigned]
            },
            topic_names,
            authors: vec![],
            year: None,
            doi: None,
            date_added: Utc::now().to_rfc3339(),
            popularity: 0,
        });
    }

    if !documents.is_empty() {
        store.insert_documents(&documents).await?;
    }

    info!(
        topics = topics.len(),
        documents = documents.len(),
        "Regenerated taxonomy from corpus"
    );

    Ok(RegenerationSummary {
        topics_count: topics.len(),
        documents_processed: documents.len(),
    })
}
