use embed_bench_run_model::{RawRun, RunPayload};

use crate::analyze;
use crate::model::RunRecord;
use crate::resolve::{file_label, MetadataResolver};

const BYTES_PER_MB: f64 = 1_048_576.0;

/// The numeric part of a [RunRecord].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    pub load_time: f64,
    pub first_paint: Option<f64>,
    pub fcp: Option<f64>,
    pub dom_interactive: Option<f64>,
    pub dom_complete: Option<f64>,
    pub avg_mem_mb: Option<f64>,
    pub avg_fps: Option<f64>,
}

/// Reduce a payload to its fixed-shape metrics.
///
/// Sample averages are `None` when there were no samples, which is distinct from a zero average.
pub fn summarize_payload(payload: &RunPayload) -> RunMetrics {
    RunMetrics {
        load_time: payload.load_time.unwrap_or(0.0),
        first_paint: payload.performance.first_paint,
        fcp: payload.performance.first_contentful_paint,
        dom_interactive: payload.performance.dom_interactive,
        dom_complete: payload.performance.dom_complete,
        avg_mem_mb: average(&payload.memory_usage).map(|bytes| bytes / BYTES_PER_MB),
        avg_fps: average(&payload.frame_rate),
    }
}

fn average(samples: &[f64]) -> Option<f64> {
    analyze::mean(&samples.iter().copied().map(Some).collect::<Vec<_>>())
}

/// Derive the canonical record for a raw run. This never fails.
pub fn summarize_run(raw: &RawRun, resolver: &MetadataResolver) -> RunRecord {
    let payload = RunPayload::from_json(&raw.payload);
    let label = file_label(&raw.source_name);
    let identity = resolver.resolve(&payload.meta, &label);
    let metrics = summarize_payload(&payload);

    let record = RunRecord {
        file_label: label,
        implementation: identity.implementation,
        instances: identity.instances,
        timestamp: identity.timestamp,
        load_time: metrics.load_time,
        first_paint: metrics.first_paint,
        fcp: metrics.fcp,
        dom_interactive: metrics.dom_interactive,
        dom_complete: metrics.dom_complete,
        avg_mem_mb: metrics.avg_mem_mb,
        avg_fps: metrics.avg_fps,
    };
    log::trace!("Summarized {}: {record:?}", raw.source_name);

    record
}
