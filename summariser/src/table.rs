use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::{ComparisonRow, Metric, RunRecord, RunsSummary, StatBundle};

const MISSING: &str = "–";

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "Implementation")]
    implementation: String,
    #[tabled(rename = "Instances")]
    instances: String,
    #[tabled(rename = "Load (ms)")]
    load_time: String,
    #[tabled(rename = "FP (ms)")]
    first_paint: String,
    #[tabled(rename = "FCP (ms)")]
    fcp: String,
    #[tabled(rename = "DOM interactive (ms)")]
    dom_interactive: String,
    #[tabled(rename = "DOM complete (ms)")]
    dom_complete: String,
    #[tabled(rename = "Memory (MB)")]
    avg_mem_mb: String,
    #[tabled(rename = "FPS")]
    avg_fps: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    p50: String,
    p95: String,
    #[tabled(rename = "std dev")]
    std_dev: String,
    count: usize,
}

#[derive(Tabled)]
struct CompareRow {
    #[tabled(rename = "Instances")]
    instances: String,
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "iframe p50")]
    iframe: String,
    #[tabled(rename = "web-component p50")]
    web_component: String,
    #[tabled(rename = "delta (iframe - web-component)")]
    delta: String,
}

/// Render an optional value with a fixed number of decimals
pub fn fmt(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.digits$}"),
        _ => MISSING.to_string(),
    }
}

/// Signed delta, followed by the signed percentage when it is defined.
pub fn fmt_delta(row: &ComparisonRow) -> String {
    let Some(delta) = row.delta else {
        return MISSING.to_string();
    };

    let sign = if delta >= 0.0 { "+" } else { "" };
    let mut out = format!("{sign}{}", fmt(Some(delta), row.metric.digits()));
    if let Some(pct) = row.delta_percent {
        let sign = if pct >= 0.0 { "+" } else { "" };
        out.push_str(&format!(" ({sign}{}%)", fmt(Some(pct), 1)));
    }
    out
}

fn fmt_time(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn runs_table(runs: &[&RunRecord]) -> Table {
    let rows = runs.iter().map(|r| RunRow {
        time: fmt_time(r.timestamp),
        implementation: r.implementation.to_string(),
        instances: r.instance_bucket().to_string(),
        load_time: fmt(Some(r.load_time), 0),
        first_paint: fmt(r.first_paint, 0),
        fcp: fmt(r.fcp, 0),
        dom_interactive: fmt(r.dom_interactive, 0),
        dom_complete: fmt(r.dom_complete, 0),
        avg_mem_mb: fmt(r.avg_mem_mb, 2),
        avg_fps: fmt(r.avg_fps, 1),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}

pub fn summary_table(summary: &RunsSummary) -> Table {
    let row = |metric: Metric, stats: &StatBundle| StatRow {
        metric: metric.label(),
        p50: fmt(stats.p50, metric.digits()),
        p95: fmt(stats.p95, metric.digits()),
        std_dev: fmt(stats.std_dev, metric.digits()),
        count: stats.count,
    };

    let mut table = Table::new([
        row(Metric::LoadTime, &summary.load_time),
        row(Metric::Fcp, &summary.fcp),
        row(Metric::AvgMemMb, &summary.avg_mem_mb),
        row(Metric::AvgFps, &summary.avg_fps),
    ]);
    table.with(Style::modern());
    table
}

pub fn comparison_table(rows: &[ComparisonRow]) -> Table {
    let rows = rows.iter().map(|row| CompareRow {
        instances: row.instances.to_string(),
        metric: row.metric.label(),
        iframe: fmt(row.median_iframe, row.metric.digits()),
        web_component: fmt(row.median_web_component, row.metric.digits()),
        delta: fmt_delta(row),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}
