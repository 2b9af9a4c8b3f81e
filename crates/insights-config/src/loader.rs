//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use insights_core::InsightsError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Prefix for environment variable overrides, e.g. `INSIGHTS__DATABASE__URL`.
pub const ENV_PREFIX: &str = "INSIGHTS";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `.env` in the working directory, if present
    /// 2. `config/default.toml` - Default values
    /// 3. `config/{APP_ENV}.toml` - Environment-specific overrides
    /// 4. `config/local.toml` - Untracked local overrides
    /// 5. Environment variables with the `INSIGHTS__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, InsightsError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, InsightsError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), InsightsError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, InsightsError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_insights_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_insights_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            InsightsError::Configuration(format_validation_errors(&errors))
        })?;

        Ok(app_config)
    }
}

fn config_error_to_insights_error(err: ConfigError) -> InsightsError {
    InsightsError::Configuration(err.to_string())
}
