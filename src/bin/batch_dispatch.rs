//! # Batch Dispatch
//!
//! Runs the item collection through the stand-in service once and prints the
//! run summary as JSON.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use batch_dispatch::config::ConfigManager;
use batch_dispatch::logging::init_structured_logging;
use batch_dispatch::{Dispatcher, EventPublisher, StandInService};

#[derive(Parser)]
#[command(name = "batch-dispatch")]
#[command(about = "Submit fixed-size batches to a rate-limited service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment name (development, test, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Items per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Total number of items
    #[arg(long)]
    items: Option<usize>,

    /// Deadline per batch, in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Capacity advertised by the stand-in service
    #[arg(long)]
    capacity: Option<u64>,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .context("failed to load configuration")?;

    let mut config = manager.config().clone();
    if let Some(batch_size) = cli.batch_size {
        config.dispatch.batch_size = batch_size;
    }
    if let Some(items) = cli.items {
        config.dispatch.number_of_items = items;
    }
    if let Some(period_ms) = cli.period_ms {
        config.dispatch.period_ms = period_ms;
    }
    if let Some(capacity) = cli.capacity {
        config.service.capacity = Some(capacity);
    }
    config.logging.json |= cli.json;
    config.validate().context("invalid configuration")?;

    init_structured_logging(&config.logging, manager.environment());

    let params = config.service_parameters()?;
    let publisher = EventPublisher::default();
    let mut service = StandInService::new(
        config.stand_in_capacity(),
        config.stand_in_period(),
        publisher.clone(),
    );
    if let Some(work_time) = config.stand_in_work_time() {
        service = service.with_work_time(work_time);
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current batch");
            signal_token.cancel();
        }
    });

    let dispatcher = Dispatcher::new(params, service, publisher).with_shutdown(shutdown);
    let summary = dispatcher.run_all().await?;

    info!(
        run_id = %summary.run_id,
        batches_blocked = summary.batches_blocked,
        "Done"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
