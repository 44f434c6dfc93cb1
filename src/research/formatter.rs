//! Text serialization of research results for the synthesis step
//!
//! Layout, per provider in first-seen order:
//!
//! ```text
//! === PERPLEXITY - Citation-backed factual research ===
//!
//! Query: <query text>
//! <content>
//! Sources:
//! - <url>
//!
//! Query: <query text>
//! [RESEARCH FAILED: <error>]
//! ```
//!
//! Successful results with empty content are omitted entirely, and a
//! provider left with no entries gets no section at all.

use crate::providers::ProviderKind;
use crate::types::{AggregatedResults, ResearchResult};

/// Marker line prefix emitted for each failed query.
pub const FAILURE_MARKER: &str = "[RESEARCH FAILED:";

/// Section label for a provider, falling back to the raw name.
pub fn provider_label(provider: &str) -> &str {
    ProviderKind::from_name(provider)
        .map(|kind| kind.label())
        .unwrap_or(provider)
}

/// Render aggregated results as a single block of structured text.
pub fn format_for_prompt(aggregated: &AggregatedResults) -> String {
    let mut groups: Vec<(&str, Vec<&ResearchResult>)> = Vec::new();
    for result in &aggregated.results {
        match groups.iter_mut().find(|(name, _)| *name == result.provider) {
            Some((_, group)) => group.push(result),
            None => groups.push((result.provider.as_str(), vec![result])),
        }
    }

    let mut sections = Vec::with_capacity(groups.len());
    for (provider, results) in groups {
        let entries: Vec<String> = results.into_iter().filter_map(format_entry).collect();
        if entries.is_empty() {
            continue;
        }

        let mut section = format!("=== {} ===", provider_label(provider));
        for entry in entries {
            section.push_str("\n\n");
            section.push_str(&entry);
        }
        sections.push(section);
    }

    let mut output = sections.join("\n\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

fn format_entry(result: &ResearchResult) -> Option<String> {
    if !result.success {
        return Some(format!(
            "Query: {}\n{} {}]",
            result.query,
            FAILURE_MARKER,
            result.error.as_deref().unwrap_or("unknown error")
        ));
    }

    let content = result.content.trim();
    if content.is_empty() {
        return None;
    }

    let mut entry = format!("Query: {}\n{}", result.query, content);
    if !result.sources.is_empty() {
        entry.push_str("\nSources:");
        for source in &result.sources {
            entry.push_str("\n- ");
            entry.push_str(source.trim());
        }
    }
    Some(entry)
}
