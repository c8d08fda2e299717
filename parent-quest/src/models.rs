use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

// Vectara query API (v1) wire models

#[derive(Debug, Serialize)]
pub struct VectaraQueryBody {
    pub query: Vec<VectaraQuery>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectaraQuery {
    pub query: String,
    pub start: u32,
    pub num_results: u32,
    pub corpus_key: Vec<CorpusKey>,
    pub summary: Vec<SummaryRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusKey {
    pub customer_id: String,
    pub corpus_id: u32,
    pub semantics: String,
    pub lexical_interpolation_config: LexicalInterpolationConfig,
}

#[derive(Debug, Serialize)]
pub struct LexicalInterpolationConfig {
    pub lambda: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub summarizer_prompt_name: String,
    pub max_summarized_results: u32,
    pub response_lang: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectaraQueryResponse {
    #[serde(default)]
    pub response_set: Vec<ResponseSet>,
}

/// One result set per input query.
#[derive(Debug, Deserialize)]
pub struct ResponseSet {
    #[serde(default)]
    pub summary: Vec<TextItem>,
    #[serde(default)]
    pub response: Vec<TextItem>,
}

#[derive(Debug, Deserialize)]
pub struct TextItem {
    #[serde(default)]
    pub text: String,
}

/// Summary and reference passages pulled out of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub summary: String,
    pub references: Vec<String>,
}

// HuggingFace hallucination evaluation model wire models

#[derive(Debug, Serialize)]
pub struct ScorePair<'a> {
    pub text: &'a str,
    pub text_pair: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LabelScore {
    #[serde(default)]
    pub label: Option<String>,
    pub score: f64,
}

// API Request/Response models

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub errored: bool,
    pub notice: Option<String>,
    pub turns: Vec<Turn>,
}
