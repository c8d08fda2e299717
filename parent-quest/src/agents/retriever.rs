// Retriever Agent: Vectara query with summarization

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info};

use super::Retriever;
use crate::config::VectaraConfig;
use crate::error::UpstreamError;
use crate::models::{
    CorpusKey, LexicalInterpolationConfig, QueryAnswer, SummaryRequest, VectaraQuery,
    VectaraQueryBody, VectaraQueryResponse,
};

pub struct VectaraRetriever {
    client: Client,
    config: VectaraConfig,
}

impl VectaraRetriever {
    pub fn new(config: VectaraConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Single-query batch for `prompt`. Pagination always starts at zero and
    /// the search is purely semantic unless `lambda` is configured otherwise.
    pub fn build_body(&self, prompt: &str) -> VectaraQueryBody {
        VectaraQueryBody {
            query: vec![VectaraQuery {
                query: prompt.to_string(),
                start: 0,
                num_results: self.config.num_results,
                corpus_key: vec![CorpusKey {
                    customer_id: self.config.customer_id.clone(),
                    corpus_id: self.config.corpus_id,
                    semantics: "DEFAULT".to_string(),
                    lexical_interpolation_config: LexicalInterpolationConfig {
                        lambda: self.config.lambda,
                    },
                }],
                summary: vec![SummaryRequest {
                    summarizer_prompt_name: self.config.summarizer_prompt_name.clone(),
                    max_summarized_results: self.config.max_summarized_results,
                    response_lang: self.config.response_lang.clone(),
                }],
            }],
        }
    }
}

#[async_trait]
impl Retriever for VectaraRetriever {
    async fn query(&self, prompt: &str) -> Result<QueryAnswer, UpstreamError> {
        info!("Retriever: Querying corpus {}", self.config.corpus_id);
        debug!("Retriever: prompt: {}", prompt);

        let resp = self
            .client
            .post(&self.config.endpoint)
            .header("customer-id", &self.config.customer_id)
            .header("x-api-key", &self.config.api_key)
            .json(&self.build_body(prompt))
            .send()
            .await
            .map_err(|e| {
                error!("Retriever: request failed: {}", e);
                UpstreamError::Http(e)
            })?;

        let status = resp.status();
        // Anything but 200 is a failure, other 2xx included.
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            error!("Retriever: Vectara returned {}: {}", status, body);
            return Err(UpstreamError::Status { status, body });
        }

        let parsed: VectaraQueryResponse = resp.json().await.map_err(|e| {
            error!("Retriever: could not decode response: {}", e);
            UpstreamError::Malformed(e.to_string())
        })?;

        // Only single-query batches are sent, so the first set is ours.
        let set = parsed
            .response_set
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Malformed("empty responseSet".to_string()))?;

        let summary = set
            .summary
            .into_iter()
            .next()
            .map(|s| s.text)
            .ok_or_else(|| UpstreamError::Malformed("response set has no summary".to_string()))?;

        let references = set.response.into_iter().map(|r| r.text).collect();

        Ok(QueryAnswer { summary, references })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::spawn_upstream;
    use serde_json::{json, Value};
    use warp::Filter;

    fn retriever_for(endpoint: &str) -> VectaraRetriever {
        let config = Config::for_tests(endpoint, "http://127.0.0.1:9/unused");
        VectaraRetriever::new(config.vectara).unwrap()
    }

    #[test]
    fn body_matches_vectara_shape() {
        let retriever = retriever_for("http://127.0.0.1:9/v1/query");
        let body = serde_json::to_value(retriever.build_body("how to sleep train")).unwrap();

        let q = &body["query"][0];
        assert_eq!(q["query"], "how to sleep train");
        assert_eq!(q["start"], 0);
        assert_eq!(q["numResults"], 10);
        assert_eq!(q["corpusKey"][0]["customerId"], "1234");
        assert_eq!(q["corpusKey"][0]["corpusId"], 1);
        assert_eq!(q["corpusKey"][0]["semantics"], "DEFAULT");
        assert_eq!(q["corpusKey"][0]["lexicalInterpolationConfig"]["lambda"], 0.0);
        assert_eq!(q["summary"][0]["summarizerPromptName"], "vectara-summary-ext-v1.2.0");
        assert_eq!(q["summary"][0]["maxSummarizedResults"], 5);
        assert_eq!(q["summary"][0]["responseLang"], "en");
    }

    #[test]
    fn empty_prompt_is_passed_through() {
        let retriever = retriever_for("http://127.0.0.1:9/v1/query");
        let body = serde_json::to_value(retriever.build_body("")).unwrap();
        assert_eq!(body["query"][0]["query"], "");
    }

    #[tokio::test]
    async fn extracts_summary_and_references_in_order() {
        let route = warp::path!("v1" / "query")
            .and(warp::post())
            .and(warp::header::<String>("customer-id"))
            .and(warp::header::<String>("x-api-key"))
            .and(warp::body::json())
            .map(|customer: String, key: String, body: Value| {
                assert_eq!(customer, "1234");
                assert_eq!(key, "vectara-key");
                assert_eq!(body["query"][0]["query"], "toddler tantrums");
                warp::reply::json(&json!({
                    "responseSet": [{
                        "summary": [{"text": "Stay calm.", "status": []}],
                        "response": [
                            {"text": "First passage", "score": 0.9},
                            {"text": "Second passage", "score": 0.5}
                        ],
                        "document": []
                    }]
                }))
            });
        let base = spawn_upstream(route).await;

        let answer = retriever_for(&format!("{}/v1/query", base))
            .query("toddler tantrums")
            .await
            .unwrap();

        assert_eq!(answer.summary, "Stay calm.");
        assert_eq!(answer.references, vec!["First passage", "Second passage"]);
    }

    #[tokio::test]
    async fn server_error_is_a_status_failure() {
        let route = warp::path!("v1" / "query").map(|| {
            warp::reply::with_status(
                warp::reply::json(&json!({"message": "boom"})),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            )
        });
        let base = spawn_upstream(route).await;

        let err = retriever_for(&format!("{}/v1/query", base))
            .query("anything")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, warp::http::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn accepted_without_ok_is_a_status_failure() {
        let route = warp::path!("v1" / "query").map(|| {
            warp::reply::with_status(
                warp::reply::json(&json!({
                    "responseSet": [{"summary": [{"text": "S"}], "response": []}]
                })),
                warp::http::StatusCode::ACCEPTED,
            )
        });
        let base = spawn_upstream(route).await;

        let err = retriever_for(&format!("{}/v1/query", base))
            .query("anything")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Status { status, .. } if status == warp::http::StatusCode::ACCEPTED
        ));
    }

    #[tokio::test]
    async fn missing_summary_is_malformed() {
        let route = warp::path!("v1" / "query")
            .map(|| warp::reply::json(&json!({"responseSet": [{"response": []}]})));
        let base = spawn_upstream(route).await;

        let err = retriever_for(&format!("{}/v1/query", base))
            .query("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_failure() {
        let err = retriever_for("http://127.0.0.1:9/v1/query")
            .query("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Http(_)));
    }
}
