//! Dual-axis HTML chart: utilization on the left, replicas on the right.

use anyhow::{bail, Result};
use chrono::SecondsFormat;
use plotly::{
    color::NamedColor,
    common::{AxisSide, Line, LineShape, Mode},
    layout::{Axis, HoverMode, Layout},
    Plot, Scatter,
};

use shadow_core::{MetricSample, ReplicaSample};

/// Render the chart as a standalone HTML page.
pub fn chart_html(metrics: &[MetricSample], decisions: &[ReplicaSample]) -> Result<String> {
    if metrics.is_empty() {
        bail!("no samples to plot");
    }

    let metric_times: Vec<String> = metrics
        .iter()
        .map(|m| m.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect();
    let utilization: Vec<f64> = metrics.iter().map(|m| m.utilization).collect();

    let decision_times: Vec<String> = decisions
        .iter()
        .map(|d| d.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect();
    let replicas: Vec<u32> = decisions.iter().map(|d| d.replicas).collect();

    let utilization_trace = Scatter::new(metric_times, utilization)
        .name("CPU Utilization")
        .mode(Mode::Lines)
        .line(Line::new().color(NamedColor::SteelBlue).width(1.5));

    // Replica counts change in discrete steps and hold until the next decision.
    let replica_trace = Scatter::new(decision_times, replicas)
        .name("Simulated Replicas")
        .mode(Mode::Lines)
        .y_axis("y2")
        .line(
            Line::new()
                .shape(LineShape::Hv)
                .color(NamedColor::DarkOrange)
                .width(2.0),
        );

    let mut plot = Plot::new();
    plot.add_trace(utilization_trace);
    plot.add_trace(replica_trace);

    let layout = Layout::new()
        .title("Shadow HPA Simulation Results")
        .x_axis(Axis::new().title("Time").grid_color(NamedColor::LightGray))
        .y_axis(
            Axis::new()
                .title("CPU Utilization (%)")
                .grid_color(NamedColor::LightGray),
        )
        .y_axis2(
            Axis::new()
                .title("Replicas")
                .overlaying("y")
                .side(AxisSide::Right),
        )
        .hover_mode(HoverMode::X);
    plot.set_layout(layout);

    Ok(plot.to_html())
}
