//! PACT daemon — entry point for running a PACT node.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pact_node::{NodeConfig, PactNode};
use pact_store_mem::MemStore;
use pact_types::SystemClock;
use pact_utils::init_tracing;

#[derive(Parser)]
#[command(name = "pact-daemon", about = "PACT promise-lifecycle node daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distinct vouches required to complete a promise.
    #[arg(long, env = "PACT_VOUCH_THRESHOLD")]
    vouch_threshold: Option<u32>,

    /// Seconds between deadline sweeps.
    #[arg(long, env = "PACT_SWEEP_INTERVAL_SECS")]
    sweep_interval: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "PACT_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(threshold) = cli.vouch_threshold {
        config.params.vouch_threshold = threshold;
    }
    if let Some(interval) = cli.sweep_interval {
        config.params.sweep_interval_secs = interval;
    }
    config.validate().context("validating configuration")?;

    init_tracing(&cli.log_level, config.log_format == "json");

    tracing::info!(
        vouch_threshold = config.params.vouch_threshold,
        sweep_interval_secs = config.params.sweep_interval_secs,
        "starting pact-daemon"
    );

    let store = Arc::new(MemStore::new());
    let node = PactNode::new(&config, store, Arc::new(SystemClock))
        .context("assembling node")?;
    node.run().await;
    Ok(())
}
