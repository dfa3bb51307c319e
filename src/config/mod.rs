//! Configuration management for the REST client pipeline.
//!
//! Configuration is loaded from a settings document under the "rest-client"
//! key and merged with defaults. The result lives in a [`SettingsHandle`] that
//! is created once and passed to every component that reads settings.

pub mod schema;

pub use schema::{LogLevel, RestClientConfig};

use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Settings key holding the pipeline configuration.
pub const SETTINGS_KEY: &str = "rest-client";

/// Loads configuration from a settings JSON value.
///
/// This function reads the "rest-client" settings, merges them with defaults
/// and validates the result.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under "rest-client" key
///
/// # Returns
///
/// `Ok(RestClientConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```
/// use rest_client_pipeline::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-client": {
///         "timeout": 60000,
///         "cacheResponses": true
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// assert!(config.cache_responses);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<RestClientConfig, String> {
    let mut config = RestClientConfig::default();

    if let Some(settings) = settings_json {
        if let Some(rest_client_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<RestClientConfig>(rest_client_settings.clone()) {
                Ok(user_config) => {
                    // User settings take precedence
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse rest-client settings: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    Ok(config)
}

/// Loads configuration from a JSON settings file.
///
/// A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> Result<RestClientConfig, String> {
    if !path.exists() {
        return load_config(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read settings file {}: {}", path.display(), e))?;
    let settings: Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse settings file {}: {}", path.display(), e))?;

    load_config(Some(settings))
}

/// Shared, updatable access to the configuration.
///
/// Cloning the handle shares the underlying configuration. Readers take a
/// snapshot with [`SettingsHandle::get`] at the start of each operation.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<RestClientConfig>>,
}

impl SettingsHandle {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Gets a snapshot of the current configuration.
    ///
    /// Falls back to defaults if the lock is poisoned.
    pub fn get(&self) -> RestClientConfig {
        self.inner
            .read()
            .map(|c| c.clone())
            .unwrap_or_else(|_| RestClientConfig::default())
    }

    /// Updates specific settings.
    ///
    /// If the updated configuration fails validation it is reverted to the
    /// defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use rest_client_pipeline::config::SettingsHandle;
    ///
    /// let settings = SettingsHandle::default();
    /// settings.update(|config| {
    ///     config.cache_responses = true;
    /// });
    /// assert!(settings.get().cache_responses);
    /// ```
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut RestClientConfig),
    {
        if let Ok(mut config) = self.inner.write() {
            updater(&mut config);

            if let Err(e) = config.validate() {
                log::warn!("Configuration validation failed after update: {}", e);
                *config = RestClientConfig::default();
            }

            crate::logging::apply_level(config.log_level);
        }
    }

    /// Replaces the configuration with one loaded from a settings document.
    pub fn reload(&self, settings_json: Option<Value>) -> Result<RestClientConfig, String> {
        let config = load_config(settings_json)?;
        if let Ok(mut current) = self.inner.write() {
            *current = config.clone();
        }
        crate::logging::apply_level(config.log_level);
        Ok(config)
    }

    /// Resets the configuration to defaults.
    pub fn reset(&self) {
        if let Ok(mut config) = self.inner.write() {
            *config = RestClientConfig::default();
        }
    }
}
