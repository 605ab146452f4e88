use std::collections::BTreeMap;

use crate::analyze::percentile;
use crate::collection::RunCollection;
use crate::model::{ComparisonRow, InstanceBucket, Metric, RunRecord};
use crate::partition::{partition_by_instances, ImplementationGroups};

/// Compare the two implementations across every instance count of the collection.
pub fn compare_collection(collection: &RunCollection) -> Vec<ComparisonRow> {
    compare_implementations(&partition_by_instances(collection))
}

/// One row per (instance count, metric): ascending instance count, then [Metric::ALL] order.
///
/// A bucket with no runs for one of the implementations still produces its rows, with the
/// missing median and the deltas set to `None`.
pub fn compare_implementations(
    partitioned: &BTreeMap<InstanceBucket, ImplementationGroups<'_>>,
) -> Vec<ComparisonRow> {
    partitioned
        .iter()
        .flat_map(|(bucket, groups)| {
            Metric::ALL
                .into_iter()
                .map(move |metric| compare_metric(*bucket, metric, groups))
        })
        .collect()
}

fn compare_metric(
    instances: InstanceBucket,
    metric: Metric,
    groups: &ImplementationGroups<'_>,
) -> ComparisonRow {
    let median_iframe = median(&groups.iframe, metric);
    let median_web_component = median(&groups.web_component, metric);

    ComparisonRow {
        instances,
        metric,
        median_iframe,
        median_web_component,
        delta: median_iframe.zip(median_web_component).map(|(i, w)| i - w),
        delta_percent: percent_delta(median_iframe, median_web_component),
    }
}

fn median(records: &[&RunRecord], metric: Metric) -> Option<f64> {
    let values = records
        .iter()
        .map(|record| record.metric(metric))
        .collect::<Vec<_>>();
    percentile(&values, 50.0)
}

/// `(a - b) / b * 100`, undefined when either side is missing or not finite, or `b` is zero.
pub fn percent_delta(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let (a, b) = a.zip(b)?;
    if !a.is_finite() || !b.is_finite() || b == 0.0 {
        return None;
    }
    Some((a - b) / b * 100.0)
}
