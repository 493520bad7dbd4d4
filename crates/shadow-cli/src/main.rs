//! shadow-hpa — evaluate an autoscaling policy against recorded load.
//!
//! # Usage
//!
//! ```text
//! shadow-hpa simulate --csv metrics.csv --target 60 --max-replicas 20 --plot replay.html
//! shadow-hpa fetch --query 'avg(rate(container_cpu_usage_seconds_total[1m])) * 100' --output metrics.csv
//! shadow-hpa init --path shadow.toml
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod plot;

use commands::fetch::FetchArgs;
use commands::simulate::SimulateArgs;

#[derive(Parser)]
#[command(
    name = "shadow-hpa",
    about = "Shadow HPA — replay historical utilization through an autoscaling policy",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a metrics CSV through a policy and report cost and risk.
    Simulate(SimulateArgs),
    /// Pull a utilization history from Prometheus into a CSV.
    Fetch(FetchArgs),
    /// Write a shadow.toml scaffold with the default policy.
    Init {
        /// Where to write the config.
        #[arg(short, long, default_value = "shadow.toml")]
        path: String,
        /// Target utilization to put in the scaffold.
        #[arg(short, long, default_value = "50")]
        target: f64,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Progress from the CLI itself, warnings from the metric sources.
fn log_filter(base: EnvFilter) -> anyhow::Result<EnvFilter> {
    Ok(base
        .add_directive("shadow_hpa=info".parse()?)
        .add_directive("shadow_metrics=warn".parse()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(EnvFilter::from_default_env())?)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::simulate(&args),
        Commands::Fetch(args) => commands::fetch::fetch(&args).await,
        Commands::Init { path, target, force } => commands::init::init(&path, target, force),
    }
}
