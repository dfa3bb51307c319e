//! Configuration schema for the REST client pipeline.
//!
//! This module defines the configuration structure and validation logic for all
//! user-configurable settings consulted by the dispatch pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration structure for the REST client pipeline.
///
/// All settings can be configured under the "rest-client" key. Missing or
/// invalid settings fall back to sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestClientConfig {
    /// Default request timeout in milliseconds.
    ///
    /// Used when a request does not carry its own timeout. Defaults to
    /// 30000ms (30 seconds). Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether successful responses are cached.
    ///
    /// When disabled every request goes to the network. Defaults to false.
    #[serde(default = "default_cache_responses")]
    pub cache_responses: bool,

    /// Time-to-live of cached responses, in seconds.
    ///
    /// Defaults to 300. Must be greater than 0.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,

    /// Maximum number of cached responses.
    ///
    /// Defaults to 100. Must be greater than 0.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,

    /// Whether requests are recorded in history. Defaults to true.
    #[serde(default = "default_save_history")]
    pub save_history: bool,

    /// Maximum number of requests to keep in history.
    ///
    /// Older requests beyond this limit are removed. Defaults to 100.
    /// Must be greater than 0.
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,

    /// Minimum level of log records that are emitted. Defaults to "info".
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Whether to automatically follow HTTP redirects. Defaults to true.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    ///
    /// Only used when `follow_redirects` is true. Defaults to 10.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// **Warning:** Disabling SSL validation can expose you to security risks.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Maps the level onto the `log` crate's filter.
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            cache_responses: default_cache_responses(),
            cache_ttl: default_cache_ttl(),
            max_cache_size: default_max_cache_size(),
            save_history: default_save_history(),
            max_history_items: default_max_history_items(),
            log_level: default_log_level(),
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            validate_ssl: default_validate_ssl(),
            user_agent: default_user_agent(),
        }
    }
}

impl RestClientConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.cache_ttl == 0 {
            return Err("cacheTtl must be greater than 0".to_string());
        }

        if self.max_cache_size == 0 {
            return Err("maxCacheSize must be greater than 0".to_string());
        }

        if self.max_history_items == 0 {
            return Err("maxHistoryItems must be greater than 0".to_string());
        }

        // max_redirects can be 0 (no redirects), so no validation needed

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout)
    }

    /// Returns the cache TTL in milliseconds.
    pub fn cache_ttl_ms(&self) -> i64 {
        i64::try_from(self.cache_ttl.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    pub fn merge(&self, other: &RestClientConfig) -> Self {
        Self {
            timeout: other.timeout,
            cache_responses: other.cache_responses,
            cache_ttl: other.cache_ttl,
            max_cache_size: other.max_cache_size,
            save_history: other.save_history,
            max_history_items: other.max_history_items,
            log_level: other.log_level,
            follow_redirects: other.follow_redirects,
            max_redirects: other.max_redirects,
            validate_ssl: other.validate_ssl,
            user_agent: other.user_agent.clone(),
        }
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_cache_responses() -> bool {
    false
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_max_cache_size() -> usize {
    100
}

fn default_save_history() -> bool {
    true
}

fn default_max_history_items() -> usize {
    100
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_validate_ssl() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("rest-client-pipeline/{}", env!("CARGO_PKG_VERSION"))
}
