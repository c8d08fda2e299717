use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_VECTARA_ENDPOINT: &str = "https://api.vectara.io/v1/query";
pub const DEFAULT_HHEM_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/vectara/hallucination_evaluation_model";
pub const DEFAULT_GREETING: &str = "How can I help you?";
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStyle {
    /// Each turn rendered as a plain text block.
    Plain,
    /// User and assistant turns rendered as chat bubbles.
    Bubbles,
}

impl ChatStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStyle::Plain => "plain",
            ChatStyle::Bubbles => "bubbles",
        }
    }
}

impl FromStr for ChatStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(ChatStyle::Plain),
            "bubbles" | "chat" => Ok(ChatStyle::Bubbles),
            other => Err(anyhow::anyhow!("Unknown CHAT_STYLE: {}", other)),
        }
    }
}

/// Static settings of the retrieval query. Everything except the prompt
/// is fixed for the life of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct VectaraConfig {
    pub endpoint: String,
    pub customer_id: String,
    pub api_key: String,
    pub corpus_id: u32,
    pub num_results: u32,
    pub lambda: f64,
    pub summarizer_prompt_name: String,
    pub max_summarized_results: u32,
    pub response_lang: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HhemConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub vectara: VectaraConfig,
    pub hhem: HhemConfig,
    pub greeting: Option<String>,
    pub chat_style: ChatStyle,
    pub max_sessions: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let vectara = VectaraConfig {
            endpoint: std::env::var("VECTARA_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_VECTARA_ENDPOINT.to_string()),
            customer_id: credential("VECTARA_CUSTOMER_ID"),
            api_key: credential("VECTARA_API_KEY"),
            corpus_id: parse_or("VECTARA_CORPUS_ID", 1)?,
            num_results: parse_or("VECTARA_NUM_RESULTS", 10)?,
            lambda: parse_or("VECTARA_LAMBDA", 0.0)?,
            summarizer_prompt_name: std::env::var("VECTARA_SUMMARIZER")
                .unwrap_or_else(|_| "vectara-summary-ext-v1.2.0".to_string()),
            max_summarized_results: parse_or("VECTARA_MAX_SUMMARIZED_RESULTS", 5)?,
            response_lang: std::env::var("VECTARA_RESPONSE_LANG")
                .unwrap_or_else(|_| "en".to_string()),
            timeout: Duration::from_secs(parse_or("VECTARA_TIMEOUT_SECS", 30)?),
        };

        let hhem = HhemConfig {
            endpoint: std::env::var("HHEM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_HHEM_ENDPOINT.to_string()),
            api_key: credential("HUGGINGFACE_API_KEY"),
            timeout: Duration::from_secs(parse_or("HHEM_TIMEOUT_SECS", 30)?),
        };

        // An explicitly empty GREETING starts conversations with no turns.
        let greeting = match std::env::var("GREETING") {
            Ok(g) if g.trim().is_empty() => None,
            Ok(g) => Some(g),
            Err(_) => Some(DEFAULT_GREETING.to_string()),
        };

        Ok(Config {
            port: parse_or("PORT", 8080)?,
            vectara,
            hhem,
            greeting,
            chat_style: match std::env::var("CHAT_STYLE") {
                Ok(s) => s.parse()?,
                Err(_) => ChatStyle::Bubbles,
            },
            max_sessions: parse_or("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Names of credential variables that were unset or empty.
    ///
    /// Startup does not fail on these; the upstream API rejects the call.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("VECTARA_CUSTOMER_ID", &self.vectara.customer_id),
            ("VECTARA_API_KEY", &self.vectara.api_key),
            ("HUGGINGFACE_API_KEY", &self.hhem.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A missing credential goes out as an empty header value.
fn credential(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config pointing both upstreams at local test servers.
    pub fn for_tests(vectara_endpoint: &str, hhem_endpoint: &str) -> Self {
        Config {
            port: 0,
            vectara: VectaraConfig {
                endpoint: vectara_endpoint.to_string(),
                customer_id: "1234".to_string(),
                api_key: "vectara-key".to_string(),
                corpus_id: 1,
                num_results: 10,
                lambda: 0.0,
                summarizer_prompt_name: "vectara-summary-ext-v1.2.0".to_string(),
                max_summarized_results: 5,
                response_lang: "en".to_string(),
                timeout: Duration::from_secs(5),
            },
            hhem: HhemConfig {
                endpoint: hhem_endpoint.to_string(),
                api_key: "hf-token".to_string(),
                timeout: Duration::from_secs(5),
            },
            greeting: Some(DEFAULT_GREETING.to_string()),
            chat_style: ChatStyle::Bubbles,
            max_sessions: 64,
            log_level: "info".to_string(),
        }
    }
}
