/// TOML configuration and credential resolution.
pub mod config;

pub use config::{ConfigError, ResearchConfig};
