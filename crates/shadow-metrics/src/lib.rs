//! shadow-metrics — where replayed utilization comes from.
//!
//! # Sources
//!
//! ```text
//! load_metrics(path)            CSV history → MetricSeries (sorted)
//! PrometheusClient::query_range PromQL range query → Vec<MetricSample>
//! write_metrics_csv(path, ..)   Vec<MetricSample> → CSV for later replay
//! decisions_csv(..)             replay decisions → CSV text
//! ```
//!
//! Everything returned from here is sorted by timestamp ascending, which is
//! what the decision engine and the regret metrics expect.

pub mod error;
pub mod loader;
pub mod prometheus;

pub use error::{FetchError, LoadError};
pub use loader::{
    decisions_csv, load_metrics, parse_timestamp, write_metrics_csv, MetricSeries,
};
pub use prometheus::{parse_query_range, PrometheusClient};
