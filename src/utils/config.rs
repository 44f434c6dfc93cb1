//! TOML-based configuration
//!
//! Loads `vendor-research.toml`. Every key has a default, so the file itself
//! is optional. API keys are never stored in the file: each provider names
//! the environment variable that holds its key.
//!
//! ```toml
//! [research]
//! timeout_ms = 60000
//! log_level = "info"
//!
//! [providers.perplexity]
//! api_key_env = "PERPLEXITY_API_KEY"
//! model = "sonar-pro"
//! ```

use crate::providers::{ProviderCredentials, ProviderKind, ProviderSettings};
use crate::research::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "vendor-research.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// `[research]` section
    #[serde(default)]
    pub research: RunConfig,

    /// `[providers.*]` sections
    #[serde(default)]
    pub providers: ProvidersConfig,
}

// ============= Run Configuration =============

/// Settings for an orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Timeout applied to each provider call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Default log filter level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

// ============= Provider Configuration =============

/// One section per concrete provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// `[providers.perplexity]`
    #[serde(default = "default_perplexity")]
    pub perplexity: ProviderConfig,

    /// `[providers.gemini]`
    #[serde(default = "default_gemini")]
    pub gemini: ProviderConfig,

    /// `[providers.grok]`
    #[serde(default = "default_grok")]
    pub grok: ProviderConfig,
}

fn default_perplexity() -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::Perplexity)
}

fn default_gemini() -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::Gemini)
}

fn default_grok() -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::Grok)
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            perplexity: default_perplexity(),
            gemini: default_gemini(),
            grok: default_grok(),
        }
    }
}

impl ProvidersConfig {
    /// Section for one provider.
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Perplexity => &self.perplexity,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Grok => &self.grok,
        }
    }
}

/// Per-provider settings. Missing keys fall back to the provider defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Environment variable containing the API key
    pub api_key_env: Option<String>,
    /// API base URL override
    pub base_url: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Response length cap override
    pub max_tokens: Option<u32>,
    /// Sampling temperature override (0.0 to 2.0)
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    fn for_kind(kind: ProviderKind) -> Self {
        Self {
            api_key_env: Some(kind.default_api_key_env().to_string()),
            ..Default::default()
        }
    }

    /// Environment variable holding this provider's key.
    pub fn api_key_env(&self, kind: ProviderKind) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| kind.default_api_key_env().to_string())
    }

    /// Resolve into client settings using the given API key.
    pub fn to_settings(&self, kind: ProviderKind, api_key: String) -> ProviderSettings {
        let defaults = ProviderSettings::new(kind, api_key);
        ProviderSettings {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url.clone()),
            model: self.model.clone().unwrap_or(defaults.model.clone()),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            ..defaults
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Requested file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// File exists but could not be read
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// File is not valid TOML for this schema
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An `api_key_env` variable is unset or blank
    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl ResearchConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load the file named on the command line, or the default file.
    ///
    /// An explicitly requested file must exist. Without one, a missing
    /// [`DEFAULT_CONFIG_FILE`] just means defaults.
    pub fn load_requested(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_or_default(DEFAULT_CONFIG_FILE),
        }
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ResearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges. Environment variables are checked later, when
    /// credentials are actually resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.research.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "research.timeout_ms must be greater than zero".to_string(),
            ));
        }

        for kind in ProviderKind::ALL {
            let provider = self.providers.get(kind);
            if let Some(temperature) = provider.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(ConfigError::ValidationError(format!(
                        "providers.{}.temperature must be between 0.0 and 2.0",
                        kind
                    )));
                }
            }
            if provider.max_tokens == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{}.max_tokens must be greater than zero",
                    kind
                )));
            }
            if let Some(url) = &provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::ValidationError(format!(
                        "providers.{}.base_url must be an http(s) URL",
                        kind
                    )));
                }
            }
        }

        Ok(())
    }

    /// Per-task timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.research.timeout_ms)
    }

    /// Resolve credentials with a custom variable lookup.
    pub fn credentials_with<F>(&self, lookup: F) -> Result<ProviderCredentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |kind: ProviderKind| -> Result<ProviderSettings, ConfigError> {
            let provider = self.providers.get(kind);
            let env = provider.api_key_env(kind);
            let api_key = lookup(&env)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(env))?;
            Ok(provider.to_settings(kind, api_key))
        };

        Ok(ProviderCredentials {
            perplexity: resolve(ProviderKind::Perplexity)?,
            gemini: resolve(ProviderKind::Gemini)?,
            grok: resolve(ProviderKind::Grok)?,
        })
    }
}

impl ProviderCredentials {
    /// Resolve all provider credentials from the environment, using the
    /// variable names and endpoint overrides in `config`.
    pub fn from_config(config: &ResearchConfig) -> Result<Self, ConfigError> {
        config.credentials_with(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_empty_file() {
        let config = ResearchConfig::parse("").unwrap();
        assert_eq!(config.research.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.research.log_level, "info");
        assert_eq!(
            config.providers.grok.api_key_env(ProviderKind::Grok),
            "XAI_API_KEY"
        );
    }

    #[test]
    fn test_parse_overrides() {
        let config = ResearchConfig::parse(
            r#"
[research]
timeout_ms = 15000

[providers.gemini]
api_key_env = "MY_GEMINI_KEY"
model = "gemini-2.5-flash"
temperature = 0.4
"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(
            config.providers.gemini.api_key_env(ProviderKind::Gemini),
            "MY_GEMINI_KEY"
        );
        // Unlisted providers keep their defaults
        assert_eq!(
            config.providers.perplexity.api_key_env(ProviderKind::Perplexity),
            "PERPLEXITY_API_KEY"
        );
    }

    #[test]
    fn test_partial_provider_table_keeps_default_env() {
        let config = ResearchConfig::parse("[providers.grok]\nmodel = \"grok-3\"\n").unwrap();
        assert_eq!(config.providers.grok.api_key_env(ProviderKind::Grok), "XAI_API_KEY");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ResearchConfig::parse("[research]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let err =
            ResearchConfig::parse("[providers.grok]\nbase_url = \"ftp://x\"\n").unwrap_err();
        assert!(err.to_string().contains("providers.grok.base_url"));
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let err = ResearchConfig::parse("[providers.perplexity]\ntemperature = 3.5\n")
            .unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ResearchConfig::parse("[research\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_credentials_resolved_from_lookup() {
        let config = ResearchConfig::parse(
            "[providers.gemini]\nmodel = \"gemini-2.5-flash\"\nbase_url = \"http://localhost:9\"\n",
        )
        .unwrap();
        let vars = env(&[
            ("PERPLEXITY_API_KEY", "pplx"),
            ("GEMINI_API_KEY", "gem"),
            ("XAI_API_KEY", "xai"),
        ]);

        let credentials = config.credentials_with(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(credentials.perplexity.api_key, "pplx");
        assert_eq!(credentials.perplexity.model, "sonar-pro");
        assert_eq!(credentials.gemini.model, "gemini-2.5-flash");
        assert_eq!(credentials.gemini.base_url, "http://localhost:9");
        assert_eq!(credentials.grok.api_key, "xai");
    }

    #[test]
    fn test_missing_env_var_reported() {
        let config = ResearchConfig::default();
        let vars = env(&[("PERPLEXITY_API_KEY", "pplx"), ("GEMINI_API_KEY", " ")]);

        let err = config
            .credentials_with(|name| vars.get(name).cloned())
            .unwrap_err();
        match err {
            ConfigError::MissingEnvVar(name) => assert_eq!(name, "GEMINI_API_KEY"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = ResearchConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
        assert!(ResearchConfig::load_or_default("/definitely/not/here.toml").is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = ResearchConfig::load_requested(Some(Path::new("/definitely/missing.toml")))
            .unwrap_err();
        match err {
            ConfigError::FileNotFound(path) => {
                assert_eq!(path, PathBuf::from("/definitely/missing.toml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[providers.grok]\nmodel = \"grok-3\"").unwrap();

        let config = ResearchConfig::load_requested(Some(file.path())).unwrap();
        assert_eq!(config.providers.grok.model.as_deref(), Some("grok-3"));
    }

    #[test]
    fn test_no_explicit_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!dir.path().join(DEFAULT_CONFIG_FILE).exists());

        let config = ResearchConfig::load_or_default(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config.research.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_from_config_reports_unset_variable() {
        let config = ResearchConfig::parse(
            "[providers.perplexity]\napi_key_env = \"VENDOR_RESEARCH_TEST_UNSET_PPLX_KEY\"\n",
        )
        .unwrap();

        let err = ProviderCredentials::from_config(&config).unwrap_err();
        match err {
            ConfigError::MissingEnvVar(name) => {
                assert_eq!(name, "VENDOR_RESEARCH_TEST_UNSET_PPLX_KEY")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[research]\ntimeout_ms = 2500").unwrap();

        let config = ResearchConfig::load(file.path()).unwrap();
        assert_eq!(config.research.timeout_ms, 2500);
    }
}
