//! # Structured Logging Module
//!
//! Environment-aware structured logging for dispatch runs.

use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::dispatch::BatchOutcome;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the given environment.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let log_level = config
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(environment).to_string());
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let console: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Another subscriber may already be installed, e.g. by a test harness
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            level = %log_level,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

/// Log structured data for a single submission attempt
pub fn log_batch_outcome(run_id: Uuid, batch_index: usize, outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::Processed {
            items,
            deadline_reached,
        } => tracing::info!(
            run_id = %run_id,
            batch_index = batch_index,
            items = items,
            deadline_reached = deadline_reached,
            "BATCH_PROCESSED"
        ),
        BatchOutcome::Blocked { items, limit } => tracing::warn!(
            run_id = %run_id,
            batch_index = batch_index,
            items = items,
            limit = limit,
            "Service is blocked"
        ),
        BatchOutcome::Failed { items, reason } => tracing::error!(
            run_id = %run_id,
            batch_index = batch_index,
            items = items,
            reason = %reason,
            "BATCH_FAILED"
        ),
    }
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
