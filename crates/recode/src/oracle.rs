use crate::prelude::*;
use async_trait::async_trait;
use serde::Deserialize;

/// An opaque chat model: prompt text in, reply text out.
///
/// Implementors own transport and provider specifics. The serve layer only
/// depends on this trait, so tests can substitute a scripted model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat-provider configuration from environment variables
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Default OpenAI API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Default chat model
    pub const DEFAULT_MODEL: &'static str = "gpt-3.5-turbo";

    /// Load configuration from environment variables
    /// Uses OPENAI_BASE_URL and OPENAI_MODEL if set, with default fallbacks
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .map_err(|_| eyre!("OPENAI_API_KEY environment variable not set"))?,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string()),
        })
    }
}

/// Chat-completion client for an OpenAI-compatible provider.
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiChat {
    /// Create an authenticated HTTP client with Bearer auth headers
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| eyre!("Invalid header value: {}", e))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0.0,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| eyre!("Chat request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(eyre!("Chat request failed: HTTP {}", response.status()));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse chat response: {}", e))?;

        // A reply with no choices is treated as empty content downstream.
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
