//! Historical utilization CSV loader.
//!
//! Expected layout (header names are case-insensitive, order is free):
//!
//! ```text
//! timestamp,cpu_utilization[,replicas]
//! 2026-02-03T21:00:00Z,60
//! 2026-02-03T22:00:00Z,75
//! ```
//!
//! `utilization` is accepted in place of `cpu_utilization`. The optional
//! `replicas` column carries the replica count actually observed at each
//! point, used for the waste metric.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::debug;

use shadow_core::{MetricSample, ReplicaSample};

use crate::error::LoadError;

const TIMESTAMP: &str = "timestamp";
const UTILIZATION: &str = "cpu_utilization";
const UTILIZATION_ALIAS: &str = "utilization";
const REPLICAS: &str = "replicas";

/// Naive layouts tried after RFC 3339; all are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A loaded, time-ordered metric history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub samples: Vec<MetricSample>,
    /// Observed replica counts, present when the CSV has a `replicas` column.
    pub replicas: Option<Vec<ReplicaSample>>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Load and sort a metrics CSV.
pub fn load_metrics(path: &Path) -> Result<MetricSeries, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let series = parse_csv(&content)?.ok_or_else(|| LoadError::Empty(path.to_path_buf()))?;
    debug!(
        path = %path.display(),
        samples = series.len(),
        has_replicas = series.replicas.is_some(),
        "metrics loaded"
    );
    Ok(series)
}

/// Column positions resolved from the header row.
struct Columns {
    timestamp: usize,
    utilization: usize,
    replicas: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, LoadError> {
        let names: Vec<String> = split_fields(header).map(|f| f.to_ascii_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let timestamp = find(TIMESTAMP);
        let utilization = find(UTILIZATION).or_else(|| find(UTILIZATION_ALIAS));

        let mut missing = Vec::new();
        if timestamp.is_none() {
            missing.push(TIMESTAMP.to_string());
        }
        if utilization.is_none() {
            missing.push(UTILIZATION.to_string());
        }

        match (timestamp, utilization) {
            (Some(timestamp), Some(utilization)) => Ok(Columns {
                timestamp,
                utilization,
                replicas: find(REPLICAS),
            }),
            _ => Err(LoadError::MissingColumns(missing)),
        }
    }

    fn width(&self) -> usize {
        self.timestamp.max(self.utilization).max(self.replicas.unwrap_or(0)) + 1
    }
}

/// Parse CSV text. Returns `None` when there is not even a header row.
fn parse_csv(content: &str) -> Result<Option<MetricSeries>, LoadError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(None);
    };
    let columns = Columns::from_header(header)?;

    let mut rows = Vec::new();
    for (line, text) in lines {
        let fields: Vec<&str> = split_fields(text).collect();
        if fields.len() < columns.width() {
            return Err(LoadError::Width {
                line,
                found: fields.len(),
                expected: columns.width(),
            });
        }

        let raw_ts = fields[columns.timestamp];
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::Timestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let raw_util = fields[columns.utilization];
        let utilization = raw_util
            .parse::<f64>()
            .ok()
            .filter(|u| u.is_finite() && *u >= 0.0)
            .ok_or_else(|| LoadError::Value {
                line,
                column: UTILIZATION,
                value: raw_util.to_string(),
            })?;

        let replicas = columns
            .replicas
            .map(|idx| {
                let raw = fields[idx];
                raw.parse::<u32>().map_err(|_| LoadError::Value {
                    line,
                    column: REPLICAS,
                    value: raw.to_string(),
                })
            })
            .transpose()?;

        rows.push((timestamp, utilization, replicas));
    }

    // Stable: equal timestamps keep file order.
    rows.sort_by_key(|(ts, _, _)| *ts);

    let samples = rows
        .iter()
        .map(|&(ts, util, _)| MetricSample::new(ts, util))
        .collect();
    let replicas = columns.replicas.map(|_| {
        rows.iter()
            .filter_map(|&(ts, _, r)| r.map(|r| ReplicaSample::new(ts, r)))
            .collect()
    });

    Ok(Some(MetricSeries { samples, replicas }))
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|f| f.trim().trim_matches('"'))
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DD[T ]HH:MM[:SS[.f]]`
/// or bare `YYYY-MM-DD` interpreted as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Write samples as `timestamp,cpu_utilization` so they can be replayed.
pub fn write_metrics_csv(path: &Path, samples: &[MetricSample]) -> std::io::Result<()> {
    std::fs::write(path, metrics_csv(samples))
}

/// Render samples in the format `load_metrics` reads.
fn metrics_csv(samples: &[MetricSample]) -> String {
    let mut out = format!("{TIMESTAMP},{UTILIZATION}\n");
    for s in samples {
        let _ = writeln!(out, "{},{}", format_timestamp(s.timestamp), s.utilization);
    }
    out
}

/// Render a replay as `timestamp,cpu_utilization,simulated_replicas`.
///
/// `decisions` must be the engine output for `samples` (same length and
/// order).
pub fn decisions_csv(samples: &[MetricSample], decisions: &[ReplicaSample]) -> String {
    let mut out = format!("{TIMESTAMP},{UTILIZATION},simulated_replicas\n");
    for (s, d) in samples.iter().zip(decisions) {
        let _ = writeln!(
            out,
            "{},{},{}",
            format_timestamp(d.timestamp),
            s.utilization,
            d.replicas
        );
    }
    out
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
