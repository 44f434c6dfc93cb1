//! # Vendor Research
//!
//! Parallel multi-provider research orchestrator for vendor security
//! assessments. A fixed batch of research queries is fanned out to several
//! independent research providers at once; partial provider failure is
//! tolerated, citations are deduplicated, and the results are serialized into
//! a text corpus for a downstream synthesis step.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vendor_research::{ProviderCredentials, conduct_research};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = ProviderCredentials::new(
//!         std::env::var("PERPLEXITY_API_KEY")?,
//!         std::env::var("GEMINI_API_KEY")?,
//!         std::env::var("XAI_API_KEY")?,
//!     );
//!
//!     let results = conduct_research("Acme Corp.", &credentials, None, Some("payroll")).await?;
//!     println!(
//!         "{} succeeded, {} failed, {} unique sources",
//!         results.success_count,
//!         results.failure_count,
//!         results.all_sources.len()
//!     );
//!     println!("{}", results.to_prompt());
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Providers
//!
//! Anything implementing [`ResearchProvider`] can be orchestrated:
//!
//! ```rust,ignore
//! use vendor_research::{QueryBatch, ResearchOrchestrator};
//! use std::{sync::Arc, time::Duration};
//!
//! let orchestrator = ResearchOrchestrator::new(vec![Arc::new(MyProvider)])
//!     .with_timeout(Duration::from_secs(10));
//! let batch = QueryBatch::new([("my-provider", vec!["question one", "question two"])]);
//! let results = orchestrator.run(&batch).await;
//! ```
//!
//! ## Modules
//!
//! - [`providers`] - Research provider trait and the Perplexity, Gemini, and Grok clients
//! - [`research`] - Query generation, orchestration, and prompt formatting
//! - [`types`] - Result types and error handling
//! - [`utils`] - TOML configuration and credential resolution
//! - [`cli`] - Command-line front end

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface.
pub mod cli;
/// Research provider clients and abstractions.
pub mod providers;
/// Query generation, orchestration, and formatting.
pub mod research;
/// Core types (results, aggregates, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use providers::{ProviderCredentials, ProviderKind, ProviderSettings, ResearchProvider};
pub use research::{QueryBatch, ResearchOrchestrator, conduct_research, format_for_prompt};
pub use types::{AggregatedResults, AppError, ResearchResult, Result, SearchOutcome};
pub use utils::config::{ConfigError, ResearchConfig};
