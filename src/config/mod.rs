//! Configuration management for the console
//!
//! Configuration comes from a YAML file, from environment variables, or from a file with
//! environment overrides applied on top. Every source is validated before use.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::auth::{AdminRule, NavigationManifest};
use crate::utils::error::{ConsoleError, Result};
use crate::utils::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable names
pub const ENV_SERVER: &str = "INFRA_SERVER";
pub const ENV_ACCESS_KEY: &str = "INFRA_ACCESS_KEY";
pub const ENV_TIMEOUT: &str = "INFRA_TIMEOUT";
pub const ENV_SKIP_TLS_VERIFY: &str = "INFRA_SKIP_TLS_VERIFY";
pub const ENV_LOG_LEVEL: &str = "INFRA_LOG_LEVEL";

/// Main configuration struct for the console
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub navigation: NavigationManifest,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConsoleError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// Override fields from `INFRA_*` variables found by `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(ENV_SERVER) {
            debug!("{} overrides the API server", ENV_SERVER);
            self.api.server = server;
        }

        if let Some(key) = lookup(ENV_ACCESS_KEY) {
            self.api.access_key = Some(key);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.api.timeout = timeout.trim().parse().map_err(|_| {
                ConsoleError::config(format!("{} must be a number of seconds: {}", ENV_TIMEOUT, timeout))
            })?;
        }

        if let Some(skip) = lookup(ENV_SKIP_TLS_VERIFY) {
            self.api.skip_tls_verify = matches!(
                skip.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.parse::<LogLevel>()?;
        }

        Ok(())
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn navigation(&self) -> &NavigationManifest {
        &self.navigation
    }

    pub fn access(&self) -> &AccessConfig {
        &self.access
    }

    /// The grant that makes a viewer an administrator
    pub fn admin_rule(&self) -> AdminRule {
        self.access.admin_rule()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.api
            .validate()
            .map_err(|e| ConsoleError::config(format!("API config error: {}", e)))?;

        self.navigation
            .validate()
            .map_err(|e| ConsoleError::config(format!("Navigation config error: {}", e)))?;

        self.access
            .validate()
            .map_err(|e| ConsoleError::config(format!("Access config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ConsoleError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
