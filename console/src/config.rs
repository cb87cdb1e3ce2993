//! Configuration management for the Beverage Distribution Console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides: `BDC_` prefix, `__` between nested
//!    keys (`BDC_API__BASE_URL`, `BDC_LOGGING__JSON`)

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ConsoleError, ConsoleResult};

/// Main console configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend API configuration
    #[validate]
    pub api: ApiConfig,

    /// Display preferences
    #[validate]
    pub display: DisplayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ApiConfig {
    /// Base URL of the backend REST API
    #[validate(url)]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DisplayConfig {
    /// Currency symbol used when formatting amounts
    #[validate(length(min = 1, max = 4))]
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Overrides the default tracing filter
    pub filter: Option<String>,
}

impl Config {
    /// Builder with the in-code defaults only
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("api.base_url", "http://localhost:8080/api")?
            .set_default("api.timeout_secs", 30)?
            .set_default("display.currency", "$")?
            .set_default("logging.json", false)
    }

    /// Load configuration from files and environment variables
    pub fn load() -> ConsoleResult<Self> {
        let environment = std::env::var("BDC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(Self::environment_overrides())
            .build()?;

        Self::from_config(config)
    }

    /// `BDC_API__TIMEOUT_SECS=45` sets `api.timeout_secs`
    pub fn environment_overrides() -> Environment {
        Environment::with_prefix("BDC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Deserialize and validate an assembled configuration
    pub fn from_config(config: config::Config) -> ConsoleResult<Self> {
        let loaded: Config = config.try_deserialize()?;
        loaded
            .validate()
            .map_err(|e| ConsoleError::Configuration(e.to_string()))?;
        Ok(loaded)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_secs)
    }
}
