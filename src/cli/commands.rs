//! Stratus CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::rpc::RpcServer;
use crate::statistics::{StatisticStore, StatisticsService};
use crate::types::config::Config;
use crate::types::stats::{SampleInput, StatResult};
use crate::{StratusError, StratusResult};

/// Writes a default `stratus.toml` into `path` (or the current directory).
pub async fn init(path: Option<PathBuf>) -> StratusResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join("stratus.toml");

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Adjust cache.ttl_hours and the [statistics] section");
    println!("  2. Start the boundary: stratus serve");

    Ok(())
}

/// Runs the JSON-RPC server on stdio until stdin closes.
pub async fn serve(config: &Config) -> StratusResult<()> {
    tracing::debug!(
        ttl_hours = config.cache.ttl_hours,
        anomaly_threshold = config.statistics.anomaly_threshold,
        "Configuration loaded"
    );

    let config = config.clone();
    tokio::task::spawn_blocking(move || RpcServer::stdio(&config).run())
        .await
        .map_err(|e| StratusError::other(format!("server task failed: {}", e)))?
}

/// Loads samples from `samples`, then prints the statistics of `location`.
pub async fn stats(location: &str, samples: &Path, config: &Config) -> StratusResult<()> {
    let result = compute_stats(location, samples, config)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn compute_stats(location: &str, samples: &Path, config: &Config) -> StratusResult<StatResult> {
    let content = std::fs::read_to_string(samples)?;
    let inputs: Vec<SampleInput> = serde_json::from_str(&content)?;

    let store = Arc::new(StatisticStore::new(&config.statistics));
    let mut inserted = 0;
    for input in &inputs {
        if store.record_raw(&input.location, &input.date, input.temperature)? {
            inserted += 1;
        }
    }

    tracing::info!(
        file = %samples.display(),
        read = inputs.len(),
        inserted,
        "Samples loaded"
    );

    StatisticsService::new(store, &config.statistics).get_statistics(location)
}

/// Prints the effective configuration as TOML.
pub async fn config_cmd(config: &Config, path: &Path) -> StratusResult<()> {
    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# defaults ({} not found)", path.display());
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Shows the version.
pub fn version() {
    println!("stratus {}", env!("CARGO_PKG_VERSION"));
}
