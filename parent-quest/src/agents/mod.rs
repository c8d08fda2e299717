use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::models::QueryAnswer;

pub mod pipeline;
pub mod retriever;
pub mod scorer;

/// Retrieval-and-summarization backend.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn query(&self, prompt: &str) -> Result<QueryAnswer, UpstreamError>;
}

/// Scores a generated summary against each reference it was built from.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn try_score(
        &self,
        generated: &str,
        references: &[String],
    ) -> Result<Vec<f64>, UpstreamError>;

    /// Scores aligned with `references`, or an empty list when scoring is
    /// unavailable.
    async fn score(&self, generated: &str, references: &[String]) -> Vec<f64> {
        match self.try_score(generated, references).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!("Scorer: scoring unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
