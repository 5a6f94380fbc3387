//! Configuration Loader
//!
//! Environment-aware layered loading built on the `config` crate.

use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::DispatcherConfig;

/// Prefix for environment variable overrides, e.g. `BATCH_DISPATCH__DISPATCH__BATCH_SIZE`
pub const ENV_PREFIX: &str = "BATCH_DISPATCH";

const BASE_FILE: &str = "dispatcher.yaml";

pub struct ConfigManager {
    config: DispatcherConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_layers(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = environment,
            batch_size = config.dispatch.batch_size,
            period_ms = config.dispatch.period_ms,
            number_of_items = config.dispatch.number_of_items,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    fn load_layers(directory: &Path, environment: &str) -> ConfigResult<DispatcherConfig> {
        let base = directory.join(BASE_FILE);
        let overlay = directory.join(format!("dispatcher.{environment}.yaml"));

        let settings = Config::builder()
            .add_source(File::new(&base.to_string_lossy(), FileFormat::Yaml).required(false))
            .add_source(File::new(&overlay.to_string_lossy(), FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigurationError::load_failed(directory.display().to_string(), e))?;

        settings
            .try_deserialize::<DispatcherConfig>()
            .map_err(|e| ConfigurationError::load_failed(directory.display().to_string(), e))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("BATCH_DISPATCH_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}
