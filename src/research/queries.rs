//! Query generation for vendor assessments
//!
//! Each provider gets a fixed set of queries written for its strength:
//! factual lookups for Perplexity, analysis for Gemini, and adversarial
//! digging for Grok. Exactly one query per provider mentions the services in
//! scope when they are given.

use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};

/// Number of queries generated for each provider.
pub const QUERIES_PER_PROVIDER: usize = 3;

/// Legal-entity suffixes stripped from vendor names, longest first so that
/// e.g. "Corporation" wins over "Corp".
const LEGAL_SUFFIXES: &[&str] = &[
    "Corporation",
    "Incorporated",
    "Limited",
    "L.L.C.",
    "GmbH",
    "Corp.",
    "Inc.",
    "Ltd.",
    "B.V.",
    "S.A.",
    "N.V.",
    "Co.",
    "Corp",
    "Inc",
    "Ltd",
    "LLC",
    "PLC",
    "LLP",
    "AG",
    "BV",
    "SA",
    "NV",
];

/// Queries for one provider, in the order they will be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderQueries {
    /// Provider name the queries are addressed to
    pub provider: String,
    /// Query texts
    pub queries: Vec<String>,
}

/// Immutable per-request query set, partitioned by provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryBatch {
    entries: Vec<ProviderQueries>,
}

impl QueryBatch {
    /// Build a batch from `(provider, queries)` pairs.
    pub fn new<P, Q>(entries: impl IntoIterator<Item = (P, Vec<Q>)>) -> Self
    where
        P: Into<String>,
        Q: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(provider, queries)| ProviderQueries {
                    provider: provider.into(),
                    queries: queries.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    /// Queries for `provider`, empty if the batch has none for it.
    pub fn queries_for(&self, provider: &str) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.provider == provider)
            .map(|entry| entry.queries.as_slice())
            .unwrap_or(&[])
    }

    /// Per-provider entries in insertion order.
    pub fn entries(&self) -> &[ProviderQueries] {
        &self.entries
    }

    /// Total number of queries across all providers.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.queries.len()).sum()
    }

    /// True when no provider has any query.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strip one trailing legal-entity suffix (case-insensitive) and trim.
///
/// The suffix must be a separate word: "Acme Corp." becomes "Acme", while
/// "Blinc" is left alone even though it ends in "inc". A name consisting of
/// nothing but a suffix is returned trimmed and otherwise unchanged.
pub fn normalize_vendor_name(name: &str) -> String {
    let trimmed = name.trim();

    for suffix in LEGAL_SUFFIXES {
        let Some(split) = trimmed.len().checked_sub(suffix.len()) else {
            continue;
        };
        let (Some(head), Some(tail)) = (trimmed.get(..split), trimmed.get(split..)) else {
            continue;
        };
        if !tail.eq_ignore_ascii_case(suffix) {
            continue;
        }
        if !head.ends_with(|c: char| c.is_whitespace() || c == ',') {
            continue;
        }
        let head = head.trim_end_matches(|c: char| c.is_whitespace() || c == ',');
        if head.is_empty() {
            continue;
        }
        return head.to_string();
    }

    trimmed.to_string()
}

/// Generate the full query batch for an assessment.
pub fn generate(vendor_name: &str, services_used: Option<&str>) -> QueryBatch {
    let vendor = normalize_vendor_name(vendor_name);
    let services = services_used.map(str::trim).filter(|s| !s.is_empty());

    QueryBatch::new(
        ProviderKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), Vec::from(queries_for_kind(kind, &vendor, services)))),
    )
}

fn queries_for_kind(
    kind: ProviderKind,
    vendor: &str,
    services: Option<&str>,
) -> [String; QUERIES_PER_PROVIDER] {
    match kind {
        ProviderKind::Perplexity => [
            format!(
                "What security certifications and compliance attestations does {vendor} hold \
                 (SOC 2 Type II, ISO 27001, ISO 27017, ISO 27018, PCI DSS, HIPAA, FedRAMP, GDPR)? \
                 Include audit dates and where the reports or certificates are published."
            ),
            format!(
                "List every publicly reported data breach, security incident, ransomware attack, \
                 or significant outage involving {vendor}, with dates, scope of impact, and how \
                 the company responded."
            ),
            match services {
                Some(services) => format!(
                    "How does {vendor} protect customer data in {services}? Cover encryption at \
                     rest and in transit, data residency, subprocessors, access controls, and \
                     data retention and deletion."
                ),
                None => format!(
                    "How does {vendor} protect customer data? Cover encryption at rest and in \
                     transit, data residency, subprocessors, access controls, and data retention \
                     and deletion."
                ),
            },
        ],
        ProviderKind::Gemini => [
            format!(
                "Provide an analytical overview of {vendor}'s security program and governance: \
                 security leadership, vulnerability disclosure or bug bounty program, \
                 penetration testing cadence, incident response commitments, and secure \
                 development practices."
            ),
            format!(
                "Assess the business stability of {vendor} as a long-term supplier: ownership \
                 and funding, financial health, recent acquisitions or layoffs, customer base, \
                 and any litigation or regulatory actions."
            ),
            match services {
                Some(services) => format!(
                    "Analyze the third-party risk of using {vendor} for {services}: key \
                     dependencies, concentration risk, integration attack surface, and the \
                     controls a customer should require contractually."
                ),
                None => format!(
                    "Analyze the third-party risk of using {vendor}: key dependencies, \
                     concentration risk, integration attack surface, and the controls a \
                     customer should require contractually."
                ),
            },
        ],
        ProviderKind::Grok => [
            format!(
                "What are customers, former employees, and security researchers saying about \
                 {vendor}'s security and reliability? Focus on complaints, criticism, and \
                 warning signs rather than marketing claims."
            ),
            format!(
                "Find controversies, lawsuits, regulatory fines, and disclosed vulnerabilities \
                 (CVEs) related to {vendor}. Were any of them downplayed or handled poorly?"
            ),
            match services {
                Some(services) => format!(
                    "Play devil's advocate: what are the strongest reasons NOT to trust {vendor} \
                     with {services}? Identify gaps between its stated security posture and its \
                     actual track record."
                ),
                None => format!(
                    "Play devil's advocate: what are the strongest reasons NOT to trust \
                     {vendor}? Identify gaps between its stated security posture and its \
                     actual track record."
                ),
            },
        ],
    }
}
