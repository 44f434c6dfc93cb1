//! Parallel Multi-Provider Vendor Research
//!
//! This module turns a vendor name into a research corpus by fanning a fixed
//! batch of queries out to several independent research providers at once,
//! tolerating partial failure, and aggregating what comes back.
//!
//! # Architecture
//!
//! - [`queries`] - Builds the per-provider query batch from the vendor name
//! - [`coordinator::ResearchOrchestrator`] - Dispatches every (provider, query)
//!   task concurrently and aggregates the settled results
//! - [`formatter`] - Serializes the aggregate into text for the synthesis step
//!
//! # Usage
//!
//! ```ignore
//! use vendor_research::providers::ProviderCredentials;
//! use vendor_research::research::conduct_research;
//!
//! let credentials = ProviderCredentials::new(pplx_key, gemini_key, xai_key);
//! let results = conduct_research("Acme Corp.", &credentials, None, None).await?;
//!
//! if results.all_failed() {
//!     eprintln!("every provider failed; synthesis should not proceed");
//! }
//! let prompt = results.to_prompt();
//! ```
//!
//! # Research Workflow
//!
//! 1. **Query Generation** - Normalize the vendor name, build 3 queries per provider
//! 2. **Fan-out** - Spawn one task per (provider, query), each with its own timeout
//! 3. **Settlement** - Wait for every task; failures and panics become failed results
//! 4. **Aggregation** - Count outcomes, collect providers used, dedupe citations
//! 5. **Formatting** - Group by provider into synthesis-ready text

/// Research orchestration and result aggregation.
pub mod coordinator;
/// Synthesis prompt formatting.
pub mod formatter;
/// Query batch generation and vendor-name normalization.
pub mod queries;

pub use coordinator::{DEFAULT_TIMEOUT_MS, ResearchOrchestrator, conduct_research};
pub use formatter::format_for_prompt;
pub use queries::{QueryBatch, generate, normalize_vendor_name};
