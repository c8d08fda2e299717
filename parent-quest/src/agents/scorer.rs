// Scorer Agent: factual consistency of a summary against its references

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info};

use super::Scorer;
use crate::config::HhemConfig;
use crate::error::UpstreamError;
use crate::models::{LabelScore, ScorePair};

/// Client for the hallucination evaluation model on the HuggingFace
/// Inference API.
pub struct HhemScorer {
    client: Client,
    config: HhemConfig,
}

impl HhemScorer {
    pub fn new(config: HhemConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Scorer for HhemScorer {
    async fn try_score(
        &self,
        generated: &str,
        references: &[String],
    ) -> Result<Vec<f64>, UpstreamError> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        info!("Scorer: Scoring summary against {} references", references.len());

        let body: Vec<ScorePair<'_>> = references
            .iter()
            .map(|reference| ScorePair {
                text: generated,
                text_pair: reference,
            })
            .collect();

        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            error!("Scorer: HHEM returned {}: {}", status, body);
            return Err(UpstreamError::Status { status, body });
        }

        let parsed: Vec<Vec<LabelScore>> = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        if parsed.len() != references.len() {
            return Err(UpstreamError::Malformed(format!(
                "expected {} scores, got {}",
                references.len(),
                parsed.len()
            )));
        }

        // The first-ranked label of each pair is taken as the consistency class.
        parsed
            .into_iter()
            .map(|labels| {
                labels
                    .first()
                    .map(|top| {
                        debug!("Scorer: top label {:?} at {}", top.label, top.score);
                        top.score
                    })
                    .ok_or_else(|| UpstreamError::Malformed("pair with no labels".to_string()))
            })
            .collect()
    }
}
