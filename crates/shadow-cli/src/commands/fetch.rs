//! `shadow-hpa fetch` — save a Prometheus range query as a replayable CSV.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use shadow_core::parse_duration;
use shadow_metrics::{write_metrics_csv, PrometheusClient};

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Prometheus base URL.
    #[arg(long, default_value = "http://localhost:9090")]
    pub url: String,
    /// PromQL query returning utilization as a percentage.
    #[arg(long)]
    pub query: String,
    /// How far back to fetch, e.g. 1h, 30m, 2d.
    #[arg(long, default_value = "1h", value_parser = parse_duration)]
    pub duration: Duration,
    /// Query resolution step.
    #[arg(long, default_value = "1m")]
    pub step: String,
    /// CSV file to write.
    #[arg(short, long)]
    pub output: PathBuf,
}

pub async fn fetch(args: &FetchArgs) -> Result<()> {
    let lookback =
        chrono::Duration::from_std(args.duration).context("lookback duration is too large")?;
    let end = Utc::now();
    let start = end
        .checked_sub_signed(lookback)
        .context("lookback reaches past the representable time range")?;

    let client = PrometheusClient::new(&args.url)?;
    let samples = client
        .query_range(&args.query, start, end, &args.step)
        .await
        .with_context(|| format!("failed to fetch metrics from {}", client.base_url()))?;

    if samples.is_empty() {
        warn!("no data retrieved; nothing written");
        return Ok(());
    }

    write_metrics_csv(&args.output, &samples)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(samples = samples.len(), path = %args.output.display(), "metrics saved");
    println!("✓ Saved {} samples to {}", samples.len(), args.output.display());
    Ok(())
}
