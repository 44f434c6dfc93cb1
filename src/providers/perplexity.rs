//! Perplexity client: factual, citation-backed web search
//!
//! Uses the OpenAI-compatible `chat/completions` endpoint. Citations come back
//! as a top-level `citations` array of URLs; newer API versions also return
//! `search_results` objects, which are used when `citations` is absent.

use crate::providers::client::{
    AuthScheme, ProviderResponse, ProviderSettings, ResearchProvider, build_http_client,
    chat_completion_content, post_json, string_array,
};
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

const SYSTEM_PROMPT: &str = "You are a meticulous security research analyst. \
Answer with verifiable facts only and cite a source for every claim. \
If information cannot be found, say so explicitly rather than guessing.";

/// Perplexity Sonar client
pub struct PerplexityClient {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl PerplexityClient {
    /// Create a new Perplexity client
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the API key is unusable.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = build_http_client("perplexity", &settings.api_key, AuthScheme::Bearer)?;
        Ok(Self { client, settings })
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "model": self.settings.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": query}
            ],
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "return_citations": true
        })
    }
}

/// Pull content and citation URLs out of a Perplexity response body.
pub(crate) fn extract_response(body: &Value) -> ProviderResponse {
    let mut sources = string_array(body.get("citations"));
    if sources.is_empty() {
        sources = body
            .get("search_results")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("url").and_then(|u| u.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
    }

    ProviderResponse {
        content: chat_completion_content(body),
        sources,
    }
}

#[async_trait]
impl ResearchProvider for PerplexityClient {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn fetch(&self, query: &str) -> Result<ProviderResponse> {
        let url = self.settings.endpoint("chat/completions");
        let body = post_json(&self.client, self.name(), &url, &self.request_body(query)).await?;
        Ok(extract_response(&body))
    }
}
