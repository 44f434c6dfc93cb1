//! CLI module
//!
//! Command-line interface for running vendor research outside the assessment
//! service. Uses clap for argument parsing and owo-colors for the summary
//! written to stderr; stdout carries only the research output.

pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parallel multi-provider vendor security research
#[derive(Parser, Debug)]
#[command(
    name = "vendor-research",
    version,
    about = "Fan vendor security research out to Perplexity, Gemini, and Grok in parallel",
    after_help = "EXAMPLES:\n    \
                  vendor-research queries \"Acme Corp.\"                 # Show the query batch\n    \
                  vendor-research assess \"Acme Corp.\" -s \"payroll\"     # Run research, print prompt text\n    \
                  vendor-research assess Acme --format json            # Print aggregated results as JSON"
)]
pub struct Cli {
    /// Path to the configuration file [default: vendor-research.toml, if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the generated query batch without contacting any provider
    Queries {
        /// Vendor display name (legal suffixes such as "Inc." are stripped)
        vendor: String,

        /// Services in scope for the assessment
        #[arg(short, long)]
        services: Option<String>,
    },

    /// Run research against all providers
    Assess {
        /// Vendor display name (legal suffixes such as "Inc." are stripped)
        vendor: String,

        /// Services in scope for the assessment
        #[arg(short, long)]
        services: Option<String>,

        /// Per-query timeout in milliseconds (overrides the config file)
        #[arg(long, env = "VENDOR_RESEARCH_TIMEOUT_MS")]
        timeout_ms: Option<u64>,

        /// Output format for stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// What `assess` writes to stdout
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Synthesis prompt text grouped by provider
    Text,
    /// Full aggregated results as JSON
    Json,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
