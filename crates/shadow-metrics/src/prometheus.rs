//! Prometheus range queries.
//!
//! Pulls a utilization history from the `/api/v1/query_range` endpoint so it
//! can be saved and replayed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use shadow_core::MetricSample;

use crate::error::FetchError;

/// Client for a Prometheus-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    base_url: String,
    http: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `query` over `[start, end]` at resolution `step` (e.g. "1m").
    ///
    /// Only the first returned series is used. An empty result is not an
    /// error; it yields no samples.
    pub async fn query_range(
        &self,
        query: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: &str,
    ) -> Result<Vec<MetricSample>, FetchError> {
        let url = format!("{}/api/v1/query_range", self.base_url);
        info!(%url, query, %start, %end, step, "querying prometheus");

        let body = self
            .http
            .get(&url)
            .query(&[
                ("query", query.to_string()),
                ("start", start.timestamp().to_string()),
                ("end", end.timestamp().to_string()),
                ("step", step.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let samples = parse_query_range(&body)?;
        if samples.is_empty() {
            warn!(query, "no data found for query");
        } else {
            debug!(samples = samples.len(), "range query complete");
        }
        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<RangeSeries>,
}

#[derive(Debug, Deserialize)]
struct RangeSeries {
    #[serde(default)]
    values: Vec<(f64, String)>,
}

/// Decode a `query_range` response body into samples.
pub fn parse_query_range(body: &str) -> Result<Vec<MetricSample>, FetchError> {
    let response: QueryResponse = serde_json::from_str(body)?;
    if response.status != "success" {
        return Err(FetchError::Query(
            response.error.unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }

    let Some(series) = response.data.and_then(|d| d.result.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let mut samples = Vec::with_capacity(series.values.len());
    let mut dropped = 0usize;
    for (ts, value) in series.values {
        let invalid = || FetchError::Sample {
            timestamp: ts,
            value: value.clone(),
        };
        let timestamp = DateTime::<Utc>::from_timestamp_millis((ts * 1000.0).round() as i64)
            .ok_or_else(invalid)?;
        let utilization = value.parse::<f64>().map_err(|_| invalid())?;
        // Prometheus reports empty rates as NaN; the CSV loader refuses them.
        if !utilization.is_finite() || utilization < 0.0 {
            dropped += 1;
            continue;
        }
        samples.push(MetricSample::new(timestamp, utilization));
    }
    if dropped > 0 {
        warn!(dropped, "skipped non-finite or negative samples");
    }

    samples.sort_by_key(|s| s.timestamp);
    Ok(samples)
}
