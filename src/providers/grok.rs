//! Grok client: contrarian research
//!
//! xAI exposes an OpenAI-compatible chat completions API. The system prompt
//! pushes the model to look for what the vendor would rather not publicize.

use crate::providers::client::{
    AuthScheme, ProviderResponse, ProviderSettings, ResearchProvider, build_http_client,
    chat_completion_content, post_json, string_array,
};
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

const SYSTEM_PROMPT: &str = "You are a skeptical third-party risk investigator. \
Look for negative signals, controversies, complaints, and gaps between a vendor's \
marketing claims and its actual track record. Be specific and state how confident \
you are in each finding.";

/// xAI Grok client
pub struct GrokClient {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GrokClient {
    /// Create a new Grok client
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the API key is unusable.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = build_http_client("grok", &settings.api_key, AuthScheme::Bearer)?;
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
            "temperature": self.settings.temperature
        })
    }
}

#[async_trait]
impl ResearchProvider for GrokClient {
    fn name(&self) -> &str {
        "grok"
    }

    async fn fetch(&self, query: &str) -> Result<ProviderResponse> {
        let url = self.settings.endpoint("chat/completions");
        let body = post_json(&self.client, self.name(), &url, &self.request_body(query)).await?;
        Ok(ProviderResponse {
            content: chat_completion_content(&body),
            sources: string_array(body.get("citations")),
        })
    }
}
