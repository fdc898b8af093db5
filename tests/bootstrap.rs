// Bootstrap tests — idempotency and assignment invariants against an
// in-memory store.

use std::collections::HashSet;
use std::sync::Arc;

use storykeep::store::models::{NewDocument, Topic};
use storykeep::store::Store;
use storykeep::tagging::bootstrap::bootstrap_if_empty;

fn story(title: &str, content: &str) -> NewDocument {
    NewDocument {
        story_id: 0,
        title: title.to_string(),
        content: content.to_string(),
        genre: "General".to_string(),
        topics: vec![],
        topic_names: vec![],
        authors: vec![],
        year: None,
        doi: None,
        date_added: "2024-01-01T00:00:00+00:00".to_string(),
        popularity: 0,
    }
}

async fn seeded_store() -> Arc<dyn Store> {
    let store = storykeep::store::open_in_memory().unwrap();
    let docs = vec![
        story(
            "The Dragon of Ember Peak",
            "The dragon slept beneath the mountain while the village argued about the dragon hoard",
        ),
        story(
            "Tides",
            "Ocean water pulled the ocean sand from beneath her feet as waves kept rolling",
        ),
        story(
            "Ember and Ash",
            "Fires swept the mountain village and left nothing but ember and silence behind",
        ),
        story(
            "Harbor Lights",
            "Ships crossed the ocean toward harbor lights that never seemed closer",
        ),
    ];
    store.insert_documents(&docs).await.unwrap();
    store
}

#[tokio::test]
async fn empty_store_creates_zero_topics() {
    let store = storykeep::store::open_in_memory().unwrap();
    bootstrap_if_empty(&store).await;
    assert_eq!(store.count_topics().await.unwrap(), 0);
}

#[tokio::test]
async fn bootstrap_seeds_topics_from_corpus() {
    let store = seeded_store().await;
    bootstrap_if_empty(&store).await;

    let count = store.count_topics().await.unwrap();
    assert!(count > 0, "expected topics seeded");
    assert!(count <= 30, "never more than 30 topics, got {count}");

    // Topics are dense singleton-keyword entries in ranking order
    let topics = store.all_topics().await.unwrap();
    for (i, topic) in topics.iter().enumerate() {
        assert_eq!(topic.topic_id, i as i64);
        assert_eq!(topic.keywords.len(), 1);
        assert!(topic.count >= 1);
        assert!(topic.representative_docs.is_empty());
        // Name is the capitalized keyword
        assert_eq!(topic.name.to_lowercase(), topic.keywords[0]);
    }

    // "dragon" and "ocean" both appear often enough to become topics
    let keywords: Vec<&str> = topics.iter().map(|t| t.keywords[0].as_str()).collect();
    assert!(keywords.contains(&"dragon"));
    assert!(keywords.contains(&"ocean"));
}

#[tokio::test]
async fn bootstrap_assigns_at_most_three_existing_ids() {
    let store = seeded_store().await;
    bootstrap_if_empty(&store).await;

    let topic_ids: HashSet<i64> = store
        .all_topics()
        .await
        .unwrap()
        .iter()
        .map(|t| t.topic_id)
        .collect();

    let mut any_assigned = false;
    for doc in store.all_documents().await.unwrap() {
        assert!(doc.topics.len() <= 3, "{} topics on '{}'", doc.topics.len(), doc.title);
        assert!(doc.topic_names.len() <= 3);
        for id in &doc.topics {
            assert!(topic_ids.contains(id), "dangling topic id {id} on '{}'", doc.title);
        }
        any_assigned |= !doc.topics.is_empty();
    }
    assert!(any_assigned, "expected at least one document tagged");
}

#[tokio::test]
async fn bootstrap_twice_is_a_noop() {
    let store = seeded_store().await;

    bootstrap_if_empty(&store).await;
    let after_first = store.count_topics().await.unwrap();
    let topics_first = store.all_topics().await.unwrap();

    bootstrap_if_empty(&store).await;
    let after_second = store.count_topics().await.unwrap();

    assert_eq!(after_first, after_second, "second run must not add topics");

    // And the taxonomy itself is untouched, not rewritten
    let topics_second = store.all_topics().await.unwrap();
    for (a, b) in topics_first.iter().zip(topics_second.iter()) {
        assert_eq!(a.topic_id, b.topic_id);
        assert_eq!(a.keywords, b.keywords);
        assert_eq!(a.count, b.count);
    }
}

#[tokio::test]
async fn bootstrap_never_overwrites_existing_taxonomy() {
    let store = seeded_store().await;
    store
        .insert_topics(&[Topic {
            topic_id: 99,
            name: "Handmade".to_string(),
            keywords: vec!["handmade".to_string()],
            count: 1,
            representative_docs: vec![],
        }])
        .await
        .unwrap();

    bootstrap_if_empty(&store).await;

    assert_eq!(store.count_topics().await.unwrap(), 1);
    let topics = store.all_topics().await.unwrap();
    assert_eq!(topics[0].topic_id, 99);

    // Documents were not re-tagged either
    for doc in store.all_documents().await.unwrap() {
        assert!(doc.topics.is_empty());
    }
}

#[tokio::test]
async fn bootstrap_topic_names_come_from_matched_topics() {
    let store = seeded_store().await;
    bootstrap_if_empty(&store).await;

    let topics = store.all_topics().await.unwrap();
    for doc in store.all_documents().await.unwrap() {
        assert_eq!(doc.topics.len(), doc.topic_names.len());
        for (id, name) in doc.topics.iter().zip(doc.topic_names.iter()) {
            let topic = topics.iter().find(|t| t.topic_id == *id).unwrap();
            assert_eq!(name, &topic.keywords[0]);
        }
    }
}
