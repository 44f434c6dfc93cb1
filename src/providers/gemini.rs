//! Gemini client: broad analytical research with Google Search grounding
//!
//! Responses are a `candidates[].content.parts[]` tree; the answer is the
//! concatenation of the text parts of the first candidate. Grounding sources
//! are read from `groundingMetadata.groundingChunks[].web.uri`.

use crate::providers::client::{
    AuthScheme, ProviderResponse, ProviderSettings, ResearchProvider, build_http_client, post_json,
};
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the API key is unusable.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = build_http_client(
            "gemini",
            &settings.api_key,
            AuthScheme::Header("x-goog-api-key"),
        )?;
        Ok(Self { client, settings })
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "contents": [{"role": "user", "parts": [{"text": query}]}],
            "tools": [{"google_search": {}}],
            "generationConfig": {
                "maxOutputTokens": self.settings.max_tokens,
                "temperature": self.settings.temperature
            }
        })
    }
}

pub(crate) fn extract_response(body: &Value) -> ProviderResponse {
    let candidate = body.pointer("/candidates/0");

    let content = candidate
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let sources = candidate
        .and_then(|c| c.pointer("/groundingMetadata/groundingChunks"))
        .and_then(|chunks| chunks.as_array())
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| chunk.pointer("/web/uri").and_then(|u| u.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ProviderResponse { content, sources }
}

#[async_trait]
impl ResearchProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch(&self, query: &str) -> Result<ProviderResponse> {
        let url = self
            .settings
            .endpoint(&format!("models/{}:generateContent", self.settings.model));
        let body = post_json(&self.client, self.name(), &url, &self.request_body(query)).await?;
        Ok(extract_response(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_joins_text_parts() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Acme runs on AWS. "},
                    {"inlineData": {"mimeType": "image/png"}},
                    {"text": "It holds ISO 27001."}
                ]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://aws.test/acme", "title": "AWS"}},
                    {"retrievedContext": {"uri": "ignored"}}
                ]}
            }]
        });
        let response = extract_response(&body);
        assert_eq!(response.content, "Acme runs on AWS. It holds ISO 27001.");
        assert_eq!(response.sources, vec!["https://aws.test/acme"]);
    }

    #[test]
    fn test_extract_no_candidates() {
        let response = extract_response(&json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(response.content.is_empty());
        assert!(response.sources.is_empty());
    }
}
