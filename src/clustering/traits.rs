// Topic model trait — the swap-ready abstraction for corpus clustering.
//
// This is the fixed interface the repository consumes; the actual model is
// an external collaborator injected at construction time. Absence of an
// implementation is a normal, reportable condition — callers hold an
// `Option<Arc<dyn TopicModel>>` and check it before use.

use anyhow::Result;
use async_trait::async_trait;

/// The id a model assigns to documents that fit no topic.
pub const NOISE_TOPIC: i64 = -1;

/// One row of the model's topic table.
#[derive(Debug, Clone)]
pub struct TopicSummary {
    pub topic_id: i64,
    pub name: String,
    /// Corpus support — how many documents the model put in this topic.
    pub count: i64,
}

/// Trait for batch topic modeling over a full corpus. Implementations are
/// async because real models run out of process or over the network.
///
/// Call order matters: `fit_transform` first, then `get_topic_info` /
/// `get_topic` describe the fitted state.
#[async_trait]
pub trait TopicModel: Send + Sync {
    /// Cluster the corpus. Returns one topic id per input document
    /// (NOISE_TOPIC for "no topic") and one probability per document.
    async fn fit_transform(&self, corpus: &[String]) -> Result<(Vec<i64>, Vec<f64>)>;

    /// The fitted topic table.
    async fn get_topic_info(&self) -> Result<Vec<TopicSummary>>;

    /// Ranked (word, score) pairs for one fitted topic, best first.
    async fn get_topic(&self, topic_id: i64) -> Result<Vec<(String, f64)>>;
}
