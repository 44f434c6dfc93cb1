use crate::{
    providers::{ProviderCredentials, ResearchProvider, create_providers},
    research::queries::{self, QueryBatch},
    types::{AggregatedResults, ResearchResult, Result},
};
use chrono::Utc;
use futures::future::join_all;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::Instrument;
use uuid::Uuid;

/// Per-task timeout applied when the caller does not supply one.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// One (provider, query) unit of work.
struct Task {
    provider: Arc<dyn ResearchProvider>,
    query: String,
}

/// Fans a query batch out across research providers and aggregates the outcomes.
pub struct ResearchOrchestrator {
    providers: Vec<Arc<dyn ResearchProvider>>,
    timeout: Duration,
}

impl ResearchOrchestrator {
    /// Orchestrate the given providers with the default per-task timeout.
    pub fn new(providers: Vec<Arc<dyn ResearchProvider>>) -> Self {
        Self {
            providers,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Build the three concrete provider clients.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if any client cannot be constructed.
    pub fn from_credentials(credentials: &ProviderCredentials) -> Result<Self> {
        Ok(Self::new(create_providers(credentials)?))
    }

    /// Set the timeout applied to every individual task.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-task timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Provider names in dispatch order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Generate queries for a vendor and run them.
    pub async fn research_vendor(
        &self,
        vendor_name: &str,
        services_used: Option<&str>,
    ) -> AggregatedResults {
        let batch = queries::generate(vendor_name, services_used);
        let vendor = queries::normalize_vendor_name(vendor_name);
        self.execute(&batch, Some(&vendor)).await
    }

    /// Dispatch every task in `batch` concurrently and aggregate once all settle.
    ///
    /// Tasks run provider-major, query-minor. Results come back in that same
    /// order no matter which task finishes first, and every task yields
    /// exactly one result, including tasks that panic.
    pub async fn run(&self, batch: &QueryBatch) -> AggregatedResults {
        self.execute(batch, None).await
    }

    async fn execute(&self, batch: &QueryBatch, vendor: Option<&str>) -> AggregatedResults {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();

        let tasks = self.build_tasks(batch);
        let span = tracing::info_span!(
            "research_run",
            %run_id,
            vendor = tracing::field::Empty,
            tasks = tasks.len()
        );
        if let Some(vendor) = vendor {
            span.record("vendor", vendor);
        }

        tracing::info!(
            parent: &span,
            providers = self.providers.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Dispatching {} research tasks",
            tasks.len()
        );

        let handles = tasks.iter().map(|task| {
            let provider = Arc::clone(&task.provider);
            let query = task.query.clone();
            let timeout = self.timeout;
            tokio::spawn(
                async move { provider.search(&query, timeout).await }.instrument(span.clone()),
            )
        });
        let outcomes = join_all(handles.collect::<Vec<_>>()).await;

        let results: Vec<ResearchResult> = tasks
            .iter()
            .zip(outcomes)
            .map(|(task, outcome)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    let message = join_error_message(e);
                    tracing::error!(
                        parent: &span,
                        provider = task.provider.name(),
                        error = %message,
                        "Research task aborted"
                    );
                    ResearchResult::failed(
                        task.provider.name(),
                        task.query.clone(),
                        message,
                        started.elapsed(),
                    )
                }
            })
            .collect();

        for failed in results.iter().filter(|r| !r.success) {
            tracing::warn!(
                parent: &span,
                provider = %failed.provider,
                error = failed.error.as_deref().unwrap_or_default(),
                "Research task failed"
            );
        }

        let aggregated =
            AggregatedResults::from_results(run_id, started_at, results, started.elapsed());

        tracing::info!(
            parent: &span,
            succeeded = aggregated.success_count,
            failed = aggregated.failure_count,
            sources = aggregated.all_sources.len(),
            elapsed_ms = aggregated.total_duration.as_millis() as u64,
            "Research run complete"
        );

        aggregated
    }

    fn build_tasks(&self, batch: &QueryBatch) -> Vec<Task> {
        self.providers
            .iter()
            .flat_map(|provider| {
                batch
                    .queries_for(provider.name())
                    .iter()
                    .map(move |query| Task {
                        provider: Arc::clone(provider),
                        query: query.clone(),
                    })
            })
            .collect()
    }
}

/// Run a full vendor assessment against the three research providers.
///
/// Provider failures, including a total outage, are reported inside the
/// returned [`AggregatedResults`]; only client construction errors are
/// returned as `Err`.
///
/// # Example
///
/// ```rust,ignore
/// let credentials = ProviderCredentials::new(pplx_key, gemini_key, xai_key);
/// let results = conduct_research("Acme Corp.", &credentials, None, Some("payroll")).await?;
/// println!("{} of {} queries succeeded", results.success_count, results.results.len());
/// ```
pub async fn conduct_research(
    vendor_name: &str,
    credentials: &ProviderCredentials,
    timeout_ms: Option<u64>,
    services_used: Option<&str>,
) -> Result<AggregatedResults> {
    let timeout = Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));
    let orchestrator = ResearchOrchestrator::from_credentials(credentials)?.with_timeout(timeout);

    tracing::info!(
        vendor = %queries::normalize_vendor_name(vendor_name),
        services = services_used.unwrap_or_default(),
        "Starting vendor research"
    );

    Ok(orchestrator.research_vendor(vendor_name, services_used).await)
}

fn join_error_message(err: JoinError) -> String {
    if err.is_cancelled() {
        return "research task was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => format!("research task panicked: {}", panic_message(payload.as_ref())),
        Err(err) => format!("research task failed: {}", err),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
