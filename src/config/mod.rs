//! # Dispatcher Configuration
//!
//! Typed configuration for the dispatcher and the stand-in service, loaded
//! in layers by [`ConfigManager`]: built-in defaults, then
//! `dispatcher.yaml`, then `dispatcher.<environment>.yaml`, then
//! `BATCH_DISPATCH__<SECTION>__<KEY>` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use batch_dispatch::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let params = manager.config().service_parameters()?;
//! println!("{} items in batches of {}", params.number_of_items(), params.batch_size());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Immutable run parameters for the dispatcher.
///
/// Only constructible through [`ServiceParameters::new`], which rejects a
/// zero batch size or a zero period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceParameters {
    batch_size: usize,
    period: Duration,
    number_of_items: usize,
}

impl ServiceParameters {
    pub fn new(batch_size: usize, period: Duration, number_of_items: usize) -> ConfigResult<Self> {
        if batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "dispatch.batch_size",
                "0",
                "batch size must be greater than 0",
            ));
        }

        if period.is_zero() {
            return Err(ConfigurationError::invalid_value(
                "dispatch.period_ms",
                "0",
                "period must be greater than 0",
            ));
        }

        Ok(Self {
            batch_size,
            period,
            number_of_items,
        })
    }

    /// Maximum items per submission
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Deadline granted to each submission
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn number_of_items(&self) -> usize {
        self.number_of_items
    }
}

/// Root configuration structure mirroring dispatcher.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DispatcherConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub service: StandInConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Batching loop settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub batch_size: usize,
    pub period_ms: u64,
    pub number_of_items: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            period_ms: 2000,
            number_of_items: 69,
        }
    }
}

/// Stand-in service settings. Unset values follow the dispatch section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StandInConfig {
    /// Advertised maximum batch size; defaults to `dispatch.batch_size`
    pub capacity: Option<u64>,
    /// Advertised rate window; defaults to `dispatch.period_ms`
    pub period_ms: Option<u64>,
    /// Simulated processing time; unset means "run until the deadline"
    pub work_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; defaults per environment
    pub level: Option<String>,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl DispatcherConfig {
    /// Validated dispatcher parameters
    pub fn service_parameters(&self) -> ConfigResult<ServiceParameters> {
        ServiceParameters::new(
            self.dispatch.batch_size,
            Duration::from_millis(self.dispatch.period_ms),
            self.dispatch.number_of_items,
        )
    }

    /// Capacity the stand-in service advertises
    pub fn stand_in_capacity(&self) -> u64 {
        self.service
            .capacity
            .unwrap_or(self.dispatch.batch_size as u64)
    }

    /// Rate window the stand-in service advertises
    pub fn stand_in_period(&self) -> Duration {
        Duration::from_millis(self.service.period_ms.unwrap_or(self.dispatch.period_ms))
    }

    pub fn stand_in_work_time(&self) -> Option<Duration> {
        self.service.work_time_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.service_parameters()?;

        if self.service.period_ms == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "service.period_ms",
                "0",
                "service period must be greater than 0",
            ));
        }

        Ok(())
    }
}
