//! Research provider abstractions
//!
//! Every provider exposes the same contract: one outbound call per query,
//! bounded by a caller-supplied timeout, always returning a well-formed
//! [`ResearchResult`]. Failures of any kind are folded into the result and
//! never surface as an `Err` to the orchestrator.

use crate::types::{AppError, ResearchResult, Result, SearchOutcome};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Maximum number of response-body characters echoed into an error string.
const ERROR_BODY_LIMIT: usize = 300;

/// Raw answer extracted from a provider response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Answer text
    pub content: String,
    /// Citation URLs, possibly empty
    pub sources: Vec<String>,
}

/// Uniform capability implemented by every research provider.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Stable provider identifier (`perplexity`, `gemini`, `grok`, ...).
    fn name(&self) -> &str;

    /// Perform exactly one remote call for `query`.
    ///
    /// Implementations may return errors freely; [`ResearchProvider::search`]
    /// converts them into failed results.
    async fn fetch(&self, query: &str) -> Result<ProviderResponse>;

    /// Run one query under `timeout`, never failing.
    ///
    /// When the deadline passes the in-flight request future is dropped,
    /// which cancels the underlying connection.
    async fn search(&self, query: &str, timeout: Duration) -> ResearchResult {
        let started = Instant::now();

        let outcome = match tokio::time::timeout(timeout, self.fetch(query)).await {
            Ok(Ok(response)) => SearchOutcome::Success {
                content: response.content,
                sources: response.sources,
            },
            Ok(Err(e)) => SearchOutcome::failure(e.to_string()),
            Err(_) => SearchOutcome::failure(format!(
                "{} request timed out after {}ms",
                self.name(),
                timeout.as_millis()
            )),
        };

        let elapsed = started.elapsed();
        match &outcome {
            SearchOutcome::Success { content, sources } => tracing::debug!(
                provider = self.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                content_len = content.len(),
                sources = sources.len(),
                "provider call succeeded"
            ),
            SearchOutcome::Failure { error } => tracing::debug!(
                provider = self.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                "provider call failed"
            ),
        }

        ResearchResult::from_outcome(self.name(), query, outcome, elapsed)
    }
}

// ============= Provider Kinds =============

/// The fixed set of concrete provider integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Factual, citation-backed web search
    Perplexity,
    /// Broad analytical research with search grounding
    Gemini,
    /// Adversarial / contrarian perspective
    Grok,
}

impl ProviderKind {
    /// All providers in dispatch order.
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Perplexity,
        ProviderKind::Gemini,
        ProviderKind::Grok,
    ];

    /// Provider name as used in results and config sections.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Grok => "grok",
        }
    }

    /// Inverse of [`ProviderKind::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Section label used when presenting this provider's findings.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "PERPLEXITY - Citation-backed factual research",
            ProviderKind::Gemini => "GEMINI - Broad analytical research",
            ProviderKind::Grok => "GROK - Contrarian and adversarial research",
        }
    }

    /// Production API base URL.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "https://api.perplexity.ai",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Grok => "https://api.x.ai/v1",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "sonar-pro",
            ProviderKind::Gemini => "gemini-2.5-pro",
            ProviderKind::Grok => "grok-4",
        }
    }

    /// Environment variable conventionally holding the API key.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "PERPLEXITY_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Grok => "XAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============= Settings and Credentials =============

/// Everything needed to construct one provider client.
#[derive(Clone)]
pub struct ProviderSettings {
    /// Secret API key
    pub api_key: String,
    /// API base URL, without the endpoint path
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Response length cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl ProviderSettings {
    /// Settings with the provider's default endpoint and model.
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }

    /// Point the client at another base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL without a trailing slash, for path joining.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

// API keys must never end up in logs.
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// One set of settings per concrete provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    /// Citation-search provider
    pub perplexity: ProviderSettings,
    /// Analytical provider
    pub gemini: ProviderSettings,
    /// Contrarian provider
    pub grok: ProviderSettings,
}

impl ProviderCredentials {
    /// Credentials using each provider's default endpoint and model.
    pub fn new(
        perplexity_key: impl Into<String>,
        gemini_key: impl Into<String>,
        grok_key: impl Into<String>,
    ) -> Self {
        Self {
            perplexity: ProviderSettings::new(ProviderKind::Perplexity, perplexity_key),
            gemini: ProviderSettings::new(ProviderKind::Gemini, gemini_key),
            grok: ProviderSettings::new(ProviderKind::Grok, grok_key),
        }
    }

    /// Settings for one provider.
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Perplexity => &self.perplexity,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Grok => &self.grok,
        }
    }
}

/// Construct the concrete client for `kind`.
///
/// # Errors
///
/// Returns `AppError::Configuration` if the credential is malformed or the
/// HTTP client cannot be built.
pub fn create_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Arc<dyn ResearchProvider>> {
    let provider: Arc<dyn ResearchProvider> = match kind {
        ProviderKind::Perplexity => Arc::new(super::perplexity::PerplexityClient::new(
            settings.clone(),
        )?),
        ProviderKind::Gemini => Arc::new(super::gemini::GeminiClient::new(settings.clone())?),
        ProviderKind::Grok => Arc::new(super::grok::GrokClient::new(settings.clone())?),
    };
    Ok(provider)
}

/// Construct all three providers in dispatch order.
pub fn create_providers(credentials: &ProviderCredentials) -> Result<Vec<Arc<dyn ResearchProvider>>> {
    ProviderKind::ALL
        .into_iter()
        .map(|kind| create_provider(kind, credentials.settings(kind)))
        .collect()
}

// ============= HTTP Helpers =============

/// How a provider expects its API key to be presented.
pub(crate) enum AuthScheme {
    Bearer,
    Header(&'static str),
}

/// Build a reqwest client with the credential baked into default headers.
///
/// Blank keys and keys that are not valid header values are rejected here.
pub(crate) fn build_http_client(
    provider: &str,
    api_key: &str,
    scheme: AuthScheme,
) -> Result<reqwest::Client> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Configuration(format!(
            "{} API key is empty",
            provider
        )));
    }

    let (name, value) = match scheme {
        AuthScheme::Bearer => (AUTHORIZATION, format!("Bearer {}", api_key)),
        AuthScheme::Header(header) => (HeaderName::from_static(header), api_key.to_string()),
    };
    let mut value = HeaderValue::from_str(&value).map_err(|_| {
        AppError::Configuration(format!(
            "{} API key contains characters not allowed in an HTTP header",
            provider
        ))
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(name, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| {
            AppError::Configuration(format!("Failed to build {} HTTP client: {}", provider, e))
        })
}

/// POST a JSON body and decode the JSON response.
///
/// Non-2xx statuses and undecodable bodies become `AppError::Provider`.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    body: &B,
) -> Result<serde_json::Value> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| AppError::Provider(format!("{} request failed: {}", provider, e)))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        AppError::Provider(format!("{} response could not be read: {}", provider, e))
    })?;

    if !status.is_success() {
        return Err(AppError::Provider(format!(
            "{} returned HTTP {}: {}",
            provider,
            status.as_u16(),
            truncate(&text, ERROR_BODY_LIMIT)
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        AppError::Provider(format!("{} returned malformed JSON: {}", provider, e))
    })
}

/// Extract `choices[0].message.content` from a chat-completion response.
pub(crate) fn chat_completion_content(body: &serde_json::Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Collect the string entries of an array, skipping anything else.
pub(crate) fn string_array(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn truncate(text: &str, limit: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut)
}
