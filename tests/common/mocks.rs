//! Mock implementations for testing.
//!
//! This module provides mock research providers that can be used across
//! different test files without duplication.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vendor_research::providers::{ProviderResponse, ResearchProvider};
use vendor_research::types::{AppError, Result};

/// How a [`MockProvider`] answers each query.
#[derive(Clone)]
pub enum MockBehavior {
    /// Succeed with `"<name>: <query>"` as content and the given sources.
    Succeed { sources: Vec<String> },
    /// Succeed with empty content.
    Hollow,
    /// Fail as a network error would.
    NetworkError,
    /// Never answer within any reasonable timeout.
    Hang,
}

/// Mock research provider with configurable behavior and optional latency.
///
/// # Examples
///
/// ```ignore
/// let provider = MockProvider::succeeding("perplexity");
/// let provider = MockProvider::failing("gemini");
/// let provider = MockProvider::succeeding("grok").with_delay(Duration::from_millis(50));
/// ```
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    behavior: MockBehavior,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(name: &str, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider that always succeeds with distinct content per query.
    pub fn succeeding(name: &str) -> Self {
        Self::new(name, MockBehavior::Succeed { sources: vec![] })
    }

    /// A provider that always succeeds and cites `sources`.
    pub fn citing(name: &str, sources: &[&str]) -> Self {
        Self::new(
            name,
            MockBehavior::Succeed {
                sources: sources.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    /// A provider that always fails with a network error.
    pub fn failing(name: &str) -> Self {
        Self::new(name, MockBehavior::NetworkError)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of outbound calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<dyn ResearchProvider> {
        Arc::new(self)
    }
}

#[async_trait]
impl ResearchProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &str) -> Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        match &self.behavior {
            MockBehavior::Succeed { sources } => Ok(ProviderResponse {
                content: format!("{}: {}", self.name, query),
                sources: sources.clone(),
            }),
            MockBehavior::Hollow => Ok(ProviderResponse::default()),
            MockBehavior::NetworkError => Err(AppError::Provider(format!(
                "{} request failed: error sending request: connection refused",
                self.name
            ))),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ProviderResponse::default())
            }
        }
    }
}
