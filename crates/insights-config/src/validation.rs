//! Configuration validation module.
//!
//! Reports every problem at once so that a bad deployment fails at startup
//! with the full list rather than one error per restart.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
    /// Timeout or TTL value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Default page size is zero or larger than the maximum.
    InvalidPageSize { default: u32, maximum: u32 },
    /// A positive count was required.
    ZeroCount { name: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidSamplingRatio { value } => {
                write!(
                    f,
                    "Invalid sampling ratio: {} (must be between 0.0 and 1.0)",
                    value
                )
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidPageSize { default, maximum } => {
                write!(
                    f,
                    "Invalid pagination: default_page_size ({}) must be between 1 and max_page_size ({})",
                    default, maximum
                )
            }
            Self::ZeroCount { name } => write!(f, "'{}' must be greater than zero", name),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_linkedin(&config.linkedin, &mut errors);
        Self::validate_ai(&config.ai, &mut errors);
        Self::validate_pagination(&config.pagination, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &crate::ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        if config.request_timeout_secs == 0 {
            errors.push(timeout_error("server.request_timeout_secs"));
        }
        if config.sync_timeout_secs == 0 {
            errors.push(timeout_error("server.sync_timeout_secs"));
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("mysql://") && !config.url.starts_with("mariadb://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql:// or mariadb://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(timeout_error("database.connect_timeout_secs"));
        }
        if config.idle_timeout_secs == 0 {
            errors.push(timeout_error("database.idle_timeout_secs"));
        }
    }

    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }
        if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if config.default_ttl_secs == 0 {
            errors.push(timeout_error("cache.default_ttl_secs"));
        }
    }

    fn validate_linkedin(config: &crate::LinkedInConfig, errors: &mut Vec<ConfigValidationError>) {
        check_base_url("linkedin.base_url", &config.base_url, errors);
        if config.timeout_secs == 0 {
            errors.push(timeout_error("linkedin.timeout_secs"));
        }
        for (name, value) in [
            ("linkedin.posts_per_sync", config.posts_per_sync),
            ("linkedin.employees_per_sync", config.employees_per_sync),
            ("linkedin.comments_per_post", config.comments_per_post),
        ] {
            if value == 0 {
                errors.push(ConfigValidationError::ZeroCount {
                    name: name.to_string(),
                });
            }
        }
    }

    fn validate_ai(config: &crate::AiConfig, errors: &mut Vec<ConfigValidationError>) {
        check_base_url("ai.base_url", &config.base_url, errors);
        if config.timeout_secs == 0 {
            errors.push(timeout_error("ai.timeout_secs"));
        }
        if config.summary_cache_ttl_secs == 0 {
            errors.push(timeout_error("ai.summary_cache_ttl_secs"));
        }
    }

    fn validate_pagination(
        config: &crate::PaginationConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            errors.push(ConfigValidationError::InvalidPageSize {
                default: config.default_page_size,
                maximum: config.max_page_size,
            });
        }
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if !(0.0..=1.0).contains(&config.sampling_ratio) {
            errors.push(ConfigValidationError::InvalidSamplingRatio {
                value: config.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = config.otlp_endpoint {
            if Url::parse(endpoint).is_err() {
                errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "otlp_endpoint".to_string(),
                    message: format!("Invalid URL format: {}", endpoint),
                });
            }
        }
    }
}

fn timeout_error(name: &str) -> ConfigValidationError {
    ConfigValidationError::NonPositiveTimeout {
        name: name.to_string(),
        value: 0,
    }
}

fn check_base_url(name: &str, value: &str, errors: &mut Vec<ConfigValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
            url_type: name.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ConfigValidationError::InvalidUrl {
            url_type: name.to_string(),
            message: format!("{}: {}", e, value),
        }),
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
