//! Research Provider Clients
//!
//! This module provides a unified interface over the external research
//! services queried during a vendor assessment.
//!
//! # Architecture
//!
//! - [`ResearchProvider`] - The capability trait every provider implements
//! - [`ProviderKind`] - The fixed set of concrete integrations
//! - [`create_providers`] - Builds one client per provider from credentials
//!
//! # Providers
//!
//! | Provider | Role | Response shape | Citations |
//! |----------|------|----------------|-----------|
//! | Perplexity | Factual / citation search | chat completion | `citations[]` |
//! | Gemini | Broad analytical search | `candidates[].content.parts[]` | grounding chunks |
//! | Grok | Contrarian / adversarial search | chat completion | `citations[]` when present |
//!
//! # Example
//!
//! ```rust,ignore
//! use vendor_research::providers::{create_providers, ProviderCredentials};
//! use std::time::Duration;
//!
//! let credentials = ProviderCredentials::new("pplx-...", "AIza...", "xai-...");
//! for provider in create_providers(&credentials)? {
//!     let result = provider.search("Acme security incidents", Duration::from_secs(30)).await;
//!     println!("{}: success={}", result.provider, result.success);
//! }
//! ```

/// Provider trait, settings, and shared HTTP helpers.
pub mod client;
/// Google Gemini analytical client.
pub mod gemini;
/// xAI Grok contrarian client.
pub mod grok;
/// Perplexity citation-search client.
pub mod perplexity;

pub use client::{
    ProviderCredentials, ProviderKind, ProviderResponse, ProviderSettings, ResearchProvider,
    create_provider, create_providers,
};
