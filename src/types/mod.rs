use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;
use uuid::Uuid;

// ============= Provider Outcome Types =============

/// Outcome of a single provider call, before it is stamped with timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The provider answered; `content` may be empty if the response lacked it.
    Success {
        /// Response text.
        content: String,
        /// Citation URLs, as returned.
        sources: Vec<String>,
    },
    /// The call failed (non-2xx, network, timeout, malformed body, panic).
    Failure {
        /// Human-readable failure reason.
        error: String,
    },
}

impl SearchOutcome {
    /// Build a [`SearchOutcome::Failure`].
    pub fn failure(error: impl Into<String>) -> Self {
        SearchOutcome::Failure {
            error: error.into(),
        }
    }
}

// ============= Research Result Types =============

/// Normalized outcome of one (provider, query) task.
///
/// Failed results always carry empty `content` and `sources` and a non-empty
/// `error`. Successful results never carry an `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// Name of the provider that ran the task
    pub provider: String,
    /// Query text sent to the provider
    pub query: String,
    /// Response text; empty for failures
    pub content: String,
    /// Citations returned with the response; empty for failures
    pub sources: Vec<String>,
    /// Whether the call succeeded
    pub success: bool,
    /// Failure reason, present only when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time of the call, serialized as `duration_ms`
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl ResearchResult {
    /// Stamp an outcome with the task identity and its elapsed time.
    pub fn from_outcome(
        provider: impl Into<String>,
        query: impl Into<String>,
        outcome: SearchOutcome,
        duration: Duration,
    ) -> Self {
        let (content, sources, success, error) = match outcome {
            SearchOutcome::Success { content, sources } => (content, sources, true, None),
            SearchOutcome::Failure { error } => {
                let error = if error.trim().is_empty() {
                    "unknown error".to_string()
                } else {
                    error
                };
                (String::new(), Vec::new(), false, Some(error))
            }
        };

        Self {
            provider: provider.into(),
            query: query.into(),
            content,
            sources,
            success,
            error,
            duration,
        }
    }

    /// Shorthand for a failed result.
    pub fn failed(
        provider: impl Into<String>,
        query: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self::from_outcome(provider, query, SearchOutcome::failure(error), duration)
    }
}

// ============= Aggregated Results =============

/// Summary of one orchestration run, derived from the full result list.
///
/// Only [`AggregatedResults::from_results`] builds this, so the counts and the
/// source list can never disagree with `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResults {
    /// Identifier for this run, also recorded on its tracing span
    pub run_id: Uuid,
    /// When dispatch began
    pub started_at: DateTime<Utc>,
    /// Every task outcome, in dispatch order (provider-major, query-minor).
    pub results: Vec<ResearchResult>,
    /// Wall time from dispatch until every task settled
    #[serde(rename = "total_duration_ms", with = "duration_ms")]
    pub total_duration: Duration,
    /// Providers with at least one successful result.
    pub providers_used: BTreeSet<String>,
    /// Deduplicated citations across successful results, first-seen order.
    pub all_sources: Vec<String>,
    /// Number of successful results
    pub success_count: usize,
    /// Number of failed results
    pub failure_count: usize,
}

impl AggregatedResults {
    /// Aggregate a settled result list in a single pass.
    pub fn from_results(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        results: Vec<ResearchResult>,
        total_duration: Duration,
    ) -> Self {
        let mut providers_used = BTreeSet::new();
        let mut all_sources = Vec::new();
        let mut seen = HashSet::new();

        for result in results.iter().filter(|r| r.success) {
            providers_used.insert(result.provider.clone());
            for source in &result.sources {
                if seen.insert(normalize_source(source)) {
                    all_sources.push(source.clone());
                }
            }
        }

        let success_count = results.iter().filter(|r| r.success).count();
        let failure_count = results.iter().filter(|r| !r.success).count();

        Self {
            run_id,
            started_at,
            results,
            total_duration,
            providers_used,
            all_sources,
            success_count,
            failure_count,
        }
    }

    /// True when there was at least one task and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.success_count == 0
    }

    /// Render the results as synthesis input text.
    pub fn to_prompt(&self) -> String {
        crate::research::formatter::format_for_prompt(self)
    }
}

/// Key used to compare citations.
///
/// Surrounding whitespace, letter case, and trailing slashes are ignored, so
/// `https://example.com` and `https://EXAMPLE.com/ ` compare equal.
pub fn normalize_source(source: &str) -> String {
    source.trim().trim_end_matches('/').to_lowercase()
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

// ============= Error Types =============

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Bad credentials or settings; raised at construction time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::utils::config::ConfigError> for AppError {
    fn from(err: crate::utils::config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result alias using [`AppError`]
pub type Result<T> = std::result::Result<T, AppError>;
