//! Colored output helpers for CLI
//!
//! Status output goes to stderr so that stdout can be piped straight into
//! the synthesis step.

use crate::research::QueryBatch;
use crate::types::AggregatedResults;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✓".green().bold(), message.green());
        } else {
            eprintln!("  [OK] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            eprintln!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            eprintln!("\n  {}", title.bright_white().bold().underline());
        } else {
            eprintln!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            eprintln!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            eprintln!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            eprintln!("\n  {}", message.dimmed().italic());
        } else {
            eprintln!("\n  [TIP] {}", message);
        }
    }

    /// Print a run summary
    pub fn summary(&self, vendor: &str, results: &AggregatedResults) {
        self.header(&format!("Research summary: {}", vendor));

        let providers = if results.providers_used.is_empty() {
            "none".to_string()
        } else {
            results
                .providers_used
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.kv("run id", &results.run_id.to_string());
        self.kv("queries", &results.results.len().to_string());
        self.kv("succeeded", &results.success_count.to_string());
        self.kv("failed", &results.failure_count.to_string());
        self.kv("providers used", &providers);
        self.kv("unique sources", &results.all_sources.len().to_string());
        self.kv(
            "duration",
            &format!("{:.1}s", results.total_duration.as_secs_f64()),
        );

        if results.all_failed() {
            self.error("Every research query failed; do not synthesize a report from this run");
        } else if results.failure_count > 0 {
            self.warning(&format!(
                "{} of {} queries failed",
                results.failure_count,
                results.results.len()
            ));
        } else {
            self.success("All research queries succeeded");
        }
    }
}

/// Render a query batch as numbered plain text.
pub fn render_query_batch(batch: &QueryBatch) -> String {
    let mut text = String::new();
    for entry in batch.entries() {
        text.push_str(&format!("[{}]\n", entry.provider));
        for (i, query) in entry.queries.iter().enumerate() {
            text.push_str(&format!("  {}. {}\n", i + 1, query));
        }
        text.push('\n');
    }
    text
}
