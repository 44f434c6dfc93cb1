//! Orchestration tests against mock providers
//!
//! These cover the batch-level guarantees: every task yields exactly one
//! result in dispatch order, failures never abort the batch, and citations
//! are deduplicated in dispatch order rather than completion order.

mod common;

use common::mocks::{MockBehavior, MockProvider};
use rstest::rstest;
use std::time::{Duration, Instant};
use vendor_research::research::formatter::FAILURE_MARKER;
use vendor_research::{QueryBatch, ResearchOrchestrator, format_for_prompt, research};

const PROVIDERS: [&str; 3] = ["perplexity", "gemini", "grok"];

fn orchestrator(providers: Vec<MockProvider>) -> ResearchOrchestrator {
    ResearchOrchestrator::new(providers.into_iter().map(MockProvider::shared).collect())
}

fn synthetic_batch(providers: usize, queries: usize) -> QueryBatch {
    QueryBatch::new((0..providers).map(|p| {
        (
            format!("p{}", p),
            (0..queries).map(|q| format!("p{}-q{}", p, q)).collect::<Vec<_>>(),
        )
    }))
}

// ============= Scenario Tests =============

#[tokio::test]
async fn test_all_providers_succeed() {
    let orchestrator =
        orchestrator(PROVIDERS.iter().map(|p| MockProvider::succeeding(p)).collect());

    let results = orchestrator.research_vendor("Acme Corp.", None).await;

    assert_eq!(results.results.len(), 9);
    assert_eq!(results.success_count, 9);
    assert_eq!(results.failure_count, 0);
    for provider in PROVIDERS {
        assert!(results.providers_used.contains(provider));
    }

    // Distinct content per task
    let mut contents: Vec<&str> = results.results.iter().map(|r| r.content.as_str()).collect();
    contents.sort();
    contents.dedup();
    assert_eq!(contents.len(), 9);
}

#[tokio::test]
async fn test_all_providers_fail_network_error() {
    let orchestrator =
        orchestrator(PROVIDERS.iter().map(|p| MockProvider::failing(p)).collect());

    let results = orchestrator.research_vendor("Acme Corp.", None).await;

    assert_eq!(results.results.len(), 9);
    assert_eq!(results.success_count, 0);
    assert_eq!(results.failure_count, 9);
    assert!(results.all_failed());
    assert!(results.providers_used.is_empty());
    for result in &results.results {
        assert!(!result.success);
        assert!(!result.error.as_deref().unwrap_or_default().is_empty());
        assert!(result.content.is_empty());
    }

    let text = format_for_prompt(&results);
    assert_eq!(text.matches(FAILURE_MARKER).count(), 9);
    for result in &results.results {
        // No content lines: every query line is followed directly by a failure marker
        let needle = format!("Query: {}\n{}", result.query, FAILURE_MARKER);
        assert!(text.contains(&needle), "missing failure entry for {}", result.query);
    }
}

#[tokio::test]
async fn test_partial_failure_keeps_other_providers() {
    let orchestrator = orchestrator(vec![
        MockProvider::succeeding("perplexity"),
        MockProvider::failing("gemini"),
        MockProvider::succeeding("grok"),
    ]);

    let results = orchestrator.research_vendor("Acme", Some("payroll")).await;

    assert_eq!(results.success_count, 6);
    assert_eq!(results.failure_count, 3);
    assert!(!results.providers_used.contains("gemini"));
    assert!(results.results[3..6].iter().all(|r| !r.success && r.provider == "gemini"));
}

#[tokio::test]
async fn test_sources_deduplicated_in_dispatch_order() {
    // The first provider in dispatch order finishes last.
    let orchestrator = orchestrator(vec![
        MockProvider::citing("perplexity", &["https://example.com"])
            .with_delay(Duration::from_millis(200)),
        MockProvider::citing("gemini", &["https://EXAMPLE.com/ "]),
        MockProvider::succeeding("grok"),
    ]);

    let results = orchestrator.research_vendor("Acme Corp.", None).await;

    assert_eq!(results.all_sources, vec!["https://example.com".to_string()]);
}

#[tokio::test]
async fn test_failed_results_do_not_contribute_sources() {
    let orchestrator = orchestrator(vec![
        MockProvider::failing("perplexity"),
        MockProvider::citing("gemini", &["https://b.test", "https://a.test"]),
    ]);

    let results = orchestrator.research_vendor("Acme", None).await;
    assert_eq!(results.all_sources, vec!["https://b.test", "https://a.test"]);
}

// ============= Ordering and Shape =============

#[rstest]
#[case(1, 1)]
#[case(2, 5)]
#[case(3, 3)]
#[case(5, 2)]
#[tokio::test]
async fn test_result_count_and_order(#[case] providers: usize, #[case] queries: usize) {
    // Later tasks finish first so completion order is the reverse of dispatch order
    let mocks = (0..providers)
        .map(|p| {
            MockProvider::succeeding(&format!("p{}", p))
                .with_delay(Duration::from_millis(((providers - p) * 20) as u64))
        })
        .collect();
    let batch = synthetic_batch(providers, queries);

    let results = orchestrator(mocks).run(&batch).await;

    assert_eq!(results.results.len(), providers * queries);
    assert_eq!(
        results.success_count + results.failure_count,
        results.results.len()
    );

    let expected: Vec<String> = (0..providers)
        .flat_map(|p| (0..queries).map(move |q| format!("p{}-q{}", p, q)))
        .collect();
    let actual: Vec<String> = results.results.iter().map(|r| r.query.clone()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_tasks_run_concurrently() {
    let delay = Duration::from_millis(300);
    let orchestrator = orchestrator(
        PROVIDERS
            .iter()
            .map(|p| MockProvider::succeeding(p).with_delay(delay))
            .collect(),
    );

    let started = Instant::now();
    let results = orchestrator.research_vendor("Acme", None).await;
    let elapsed = started.elapsed();

    assert_eq!(results.success_count, 9);
    // Nine serial calls would take 2.7s
    assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_each_task_calls_provider_once() {
    let perplexity = MockProvider::succeeding("perplexity");
    let gemini = MockProvider::failing("gemini");
    let orchestrator =
        ResearchOrchestrator::new(vec![perplexity.clone().shared(), gemini.clone().shared()]);

    orchestrator.research_vendor("Acme", None).await;

    // No retries for failed calls
    assert_eq!(perplexity.calls(), 3);
    assert_eq!(gemini.calls(), 3);
}

// ============= Timeouts =============

#[tokio::test]
async fn test_hanging_provider_times_out_without_blocking_others() {
    let orchestrator = orchestrator(vec![
        MockProvider::succeeding("perplexity"),
        MockProvider::new("gemini", MockBehavior::Hang),
        MockProvider::succeeding("grok"),
    ])
    .with_timeout(Duration::from_millis(100));

    let started = Instant::now();
    let results = orchestrator.research_vendor("Acme", None).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(results.success_count, 6);
    assert_eq!(results.failure_count, 3);
    for result in results.results.iter().filter(|r| r.provider == "gemini") {
        assert!(result.error.as_deref().unwrap().contains("timed out after 100ms"));
    }
}

// ============= Formatting =============

#[tokio::test]
async fn test_hollow_results_are_omitted_from_prompt() {
    let orchestrator = orchestrator(vec![
        MockProvider::new("perplexity", MockBehavior::Hollow),
        MockProvider::succeeding("grok"),
    ]);

    let results = orchestrator.research_vendor("Acme", None).await;
    assert_eq!(results.success_count, 6);

    let text = results.to_prompt();
    assert!(!text.contains("=== PERPLEXITY"));
    assert!(text.starts_with("=== GROK"));
    assert_eq!(text.matches("Query: ").count(), 3);
}

#[tokio::test]
async fn test_prompt_sections_follow_dispatch_order() {
    let orchestrator = orchestrator(vec![
        MockProvider::succeeding("grok").with_delay(Duration::from_millis(100)),
        MockProvider::succeeding("perplexity"),
    ]);

    let text = orchestrator.research_vendor("Acme", None).await.to_prompt();
    assert!(text.find("=== GROK").unwrap() < text.find("=== PERPLEXITY").unwrap());
}

// ============= Query Batch =============

#[test]
fn test_generated_batch_drops_legal_suffix() {
    let batch = research::generate("Acme Corp.", Some("HR data processing"));
    assert_eq!(batch.len(), 9);
    for query in batch.entries().iter().flat_map(|e| &e.queries) {
        assert!(query.contains("Acme"));
        assert!(!query.contains("Corp."));
    }
}
