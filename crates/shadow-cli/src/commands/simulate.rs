//! `shadow-hpa simulate` — replay a metrics CSV through one policy.
//!
//! Everything is computed before anything is written, so a failure part
//! way through never leaves a partial report behind.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use shadow_core::{parse_duration, Policy, ShadowConfig};
use shadow_metrics::{decisions_csv, load_metrics};
use shadow_regret::{format_report, RegretReport, DEFAULT_RISK_LOOKAHEAD};

use crate::plot;

#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    /// Historical metrics CSV (timestamp, cpu_utilization[, replicas]).
    #[arg(long)]
    pub csv: PathBuf,
    /// Target utilization percentage (1-100).
    #[arg(long)]
    pub target: Option<f64>,
    /// Minimum replicas [default: 1]
    #[arg(long)]
    pub min_replicas: Option<u32>,
    /// Maximum replicas [default: 10]
    #[arg(long)]
    pub max_replicas: Option<u32>,
    /// Dead-zone around the target ratio (0-1) [default: 0.1]
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Scale-down stabilization window in seconds [default: 300]
    #[arg(long)]
    pub scale_down_window: Option<u64>,
    /// How long after a scale-down to watch for overload, e.g. "5m" [default: 5m]
    #[arg(long, value_parser = parse_duration)]
    pub risk_lookahead: Option<Duration>,
    /// shadow.toml with policy defaults; flags take precedence.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,
    /// Write an HTML chart of utilization and replicas.
    #[arg(long)]
    pub plot: Option<PathBuf>,
    /// Write the decision sequence as CSV.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Policy and analysis settings after merging flags, config and defaults.
#[derive(Debug)]
pub struct Settings {
    pub policy: Policy,
    pub risk_lookahead: Duration,
}

impl Settings {
    pub fn resolve(args: &SimulateArgs, config: &ShadowConfig) -> Result<Self> {
        let file = config.policy();

        let target = args
            .target
            .or(file.target_utilization)
            .context("no target utilization: pass --target or set policy.target_utilization")?;
        let min_replicas = args.min_replicas.or(file.min_replicas).unwrap_or(1);
        let max_replicas = args.max_replicas.or(file.max_replicas).unwrap_or(10);
        let tolerance = args
            .tolerance
            .or(file.tolerance)
            .unwrap_or(Policy::DEFAULT_TOLERANCE);

        let scale_down_window = match args.scale_down_window {
            Some(secs) => Duration::from_secs(secs),
            None => config
                .scale_down_window()?
                .unwrap_or(Policy::DEFAULT_SCALE_DOWN_WINDOW),
        };
        let risk_lookahead = match args.risk_lookahead {
            Some(d) => d,
            None => config.risk_lookahead()?.unwrap_or(DEFAULT_RISK_LOOKAHEAD),
        };

        let policy = Policy::builder(min_replicas, max_replicas, target)
            .tolerance(tolerance)
            .scale_down_window(scale_down_window)
            .build()
            .context("invalid autoscaling policy")?;

        Ok(Settings {
            policy,
            risk_lookahead,
        })
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    policy: &'a Policy,
    samples: usize,
    report: &'a RegretReport,
}

pub fn simulate(args: &SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ShadowConfig::from_file(path)?,
        None => ShadowConfig::default(),
    };
    let settings = Settings::resolve(args, &config)?;
    let policy = settings.policy;

    info!(path = %args.csv.display(), "loading metrics");
    let series = load_metrics(&args.csv)
        .with_context(|| format!("failed to load {}", args.csv.display()))?;

    info!(
        target = policy.target_utilization(),
        min = policy.min_replicas(),
        max = policy.max_replicas(),
        samples = series.len(),
        "running simulation"
    );
    let decisions = shadow_autoscale::simulate(&policy, &series.samples);

    let report = RegretReport::compute(
        &decisions,
        &series.samples,
        series.replicas.as_deref(),
        policy.target_utilization(),
        settings.risk_lookahead,
    );

    let mut outputs = Vec::new();
    if let Some(path) = &args.plot {
        outputs.push((path.as_path(), plot::chart_html(&series.samples, &decisions)?));
    }
    if let Some(path) = &args.output {
        outputs.push((path.as_path(), decisions_csv(&series.samples, &decisions)));
    }
    write_outputs(&outputs)?;

    match args.format.as_str() {
        "json" => {
            let summary = Summary {
                policy: &policy,
                samples: decisions.len(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            print!("{}", format_report(&report));
        }
    }

    Ok(())
}

/// Write every output or none of them.
///
/// Each file is staged next to its destination and only renamed into place
/// once all of them have been written.
fn write_outputs(outputs: &[(&Path, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir)
            .and_then(|mut file| file.write_all(contents.as_bytes()).map(|()| file))
            .with_context(|| format!("failed to write {}", path.display()))?;
        staged.push((*path, file));
    }

    for (path, file) in staged {
        file.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "output written");
    }
    Ok(())
}
