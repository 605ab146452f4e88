use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::filter::RunSelection;

/// The UI embedding strategy a run was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Implementation {
    Iframe,
    WebComponent,
    Unknown,
}

impl Implementation {
    /// Normalize a resolved implementation name.
    ///
    /// Only the exact literals `iframe` and `web-component` are recognised, anything else is
    /// [Implementation::Unknown].
    pub fn normalize(name: Option<&str>) -> Self {
        match name {
            Some("iframe") => Implementation::Iframe,
            Some("web-component") => Implementation::WebComponent,
            _ => Implementation::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Implementation::Iframe => "iframe",
            Implementation::WebComponent => "web-component",
            Implementation::Unknown => "unknown",
        }
    }
}

impl Display for Implementation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown implementation `{0}`, expected one of iframe, web-component, unknown")]
pub struct ParseImplementationError(pub String);

impl FromStr for Implementation {
    type Err = ParseImplementationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iframe" => Ok(Implementation::Iframe),
            "web-component" => Ok(Implementation::WebComponent),
            "unknown" => Ok(Implementation::Unknown),
            other => Err(ParseImplementationError(other.to_string())),
        }
    }
}

/// Grouping key for runs by instance count.
///
/// Runs whose instance count could not be resolved share the [InstanceBucket::Unresolved] bucket,
/// which orders after every known count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "Option<u32>")]
pub enum InstanceBucket {
    Count(u32),
    Unresolved,
}

impl From<Option<u32>> for InstanceBucket {
    fn from(value: Option<u32>) -> Self {
        value.map_or(InstanceBucket::Unresolved, InstanceBucket::Count)
    }
}

impl From<InstanceBucket> for Option<u32> {
    fn from(value: InstanceBucket) -> Self {
        match value {
            InstanceBucket::Count(n) => Some(n),
            InstanceBucket::Unresolved => None,
        }
    }
}

impl Display for InstanceBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceBucket::Count(n) => write!(f, "{n}"),
            InstanceBucket::Unresolved => f.write_str("unresolved"),
        }
    }
}

/// The canonical, fully derived record for one stored run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Base name of the source, without path or query. Display only.
    pub file_label: String,
    pub implementation: Implementation,
    /// `None` when no source supplied a usable instance count
    pub instances: Option<u32>,
    /// Capture time in Unix milliseconds
    pub timestamp: i64,
    pub load_time: f64,
    pub first_paint: Option<f64>,
    pub fcp: Option<f64>,
    pub dom_interactive: Option<f64>,
    pub dom_complete: Option<f64>,
    #[serde(rename = "avgMemMB")]
    pub avg_mem_mb: Option<f64>,
    pub avg_fps: Option<f64>,
}

impl RunRecord {
    pub fn instance_bucket(&self) -> InstanceBucket {
        self.instances.into()
    }

    /// The value of a compared metric for this run
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::LoadTime => Some(self.load_time),
            Metric::Fcp => self.fcp,
            Metric::AvgMemMb => self.avg_mem_mb,
            Metric::AvgFps => self.avg_fps,
        }
    }
}

/// The metrics compared across implementations, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "loadTime")]
    LoadTime,
    #[serde(rename = "fcp")]
    Fcp,
    #[serde(rename = "avgMemMB")]
    AvgMemMb,
    #[serde(rename = "avgFps")]
    AvgFps,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::LoadTime,
        Metric::Fcp,
        Metric::AvgMemMb,
        Metric::AvgFps,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::LoadTime => "loadTime",
            Metric::Fcp => "fcp",
            Metric::AvgMemMb => "avgMemMB",
            Metric::AvgFps => "avgFps",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::LoadTime => "Load (ms)",
            Metric::Fcp => "FCP (ms)",
            Metric::AvgMemMb => "Memory (MB)",
            Metric::AvgFps => "FPS",
        }
    }

    /// Decimal places used when rendering a value of this metric
    pub fn digits(&self) -> usize {
        match self {
            Metric::LoadTime | Metric::Fcp => 0,
            Metric::AvgMemMb => 2,
            Metric::AvgFps => 1,
        }
    }
}

/// Summary statistics over one numeric series.
///
/// Every statistic is `None` when there was not enough finite data to compute it. `count` is the
/// number of finite values that were used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBundle {
    pub p50: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: usize,
}

/// One (instance count, metric) comparison between the two implementations.
///
/// `delta` is `median_iframe - median_web_component`. A positive delta means the iframe median is
/// numerically larger; whether that is better depends on the metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub instances: InstanceBucket,
    #[serde(rename = "metricKey")]
    pub metric: Metric,
    pub median_iframe: Option<f64>,
    pub median_web_component: Option<f64>,
    pub delta: Option<f64>,
    pub delta_percent: Option<f64>,
}

/// The summary panel over a selection of runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunsSummary {
    pub total_runs: usize,
    pub load_time: StatBundle,
    pub fcp: StatBundle,
    #[serde(rename = "avgMemMB")]
    pub avg_mem_mb: StatBundle,
    pub avg_fps: StatBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput {
    /// Time the report was built, in Unix milliseconds
    pub generated_at: i64,
    pub selection: RunSelection,
    /// The selected runs, most recent first
    pub runs: Vec<RunRecord>,
    pub summary: RunsSummary,
    /// Comparison over every loaded run, regardless of the selection
    pub comparison: Vec<ComparisonRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_only_accepts_exact_literals() {
        assert_eq!(
            Implementation::normalize(Some("iframe")),
            Implementation::Iframe
        );
        assert_eq!(
            Implementation::normalize(Some("web-component")),
            Implementation::WebComponent
        );
        assert_eq!(
            Implementation::normalize(Some("IFRAME")),
            Implementation::Unknown
        );
        assert_eq!(
            Implementation::normalize(Some("shadow-dom")),
            Implementation::Unknown
        );
        assert_eq!(Implementation::normalize(None), Implementation::Unknown);
    }

    #[test]
    fn unresolved_bucket_orders_last() {
        let mut buckets = vec![
            InstanceBucket::Unresolved,
            InstanceBucket::Count(10),
            InstanceBucket::Count(1),
        ];
        buckets.sort();
        assert_eq!(
            buckets,
            vec![
                InstanceBucket::Count(1),
                InstanceBucket::Count(10),
                InstanceBucket::Unresolved
            ]
        );
    }

    #[test]
    fn record_serializes_with_dashboard_keys() -> anyhow::Result<()> {
        let record = RunRecord {
            file_label: "iframe-1-instances-1.json".to_string(),
            implementation: Implementation::WebComponent,
            instances: None,
            timestamp: 1,
            load_time: 0.0,
            first_paint: None,
            fcp: Some(12.0),
            dom_interactive: None,
            dom_complete: None,
            avg_mem_mb: Some(1.5),
            avg_fps: None,
        };

        let value = serde_json::to_value(&record)?;
        assert_eq!(value["implementation"], "web-component");
        assert_eq!(value["instances"], serde_json::Value::Null);
        assert_eq!(value["avgMemMB"], 1.5);
        assert_eq!(value["fileLabel"], "iframe-1-instances-1.json");
        Ok(())
    }
}
