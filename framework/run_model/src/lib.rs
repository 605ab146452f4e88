use serde::Serialize;
use serde_json::Value;
use std::io::Read;

/// A single stored benchmark run, exactly as it was received from the run store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRun {
    /// The name the run was stored under.
    ///
    /// This may include a directory path and a query suffix, for example
    /// `data/iframe-5-instances-1700000000000.json?t=1`.
    pub source_name: String,
    /// The untyped payload captured by the instrumentation.
    pub payload: Value,
}

impl RawRun {
    pub fn new(source_name: impl Into<String>, payload: Value) -> Self {
        Self {
            source_name: source_name.into(),
            payload,
        }
    }
}

/// Metadata the instrumentation embeds in the payload under `_meta`.
///
/// Every field is optional. A field is only set when the payload carried a usable, non-empty
/// value for it, so a zero instance count or a zero timestamp is treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Paint and navigation timings, in milliseconds since navigation start.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTimings {
    pub first_paint: Option<f64>,
    pub first_contentful_paint: Option<f64>,
    pub dom_interactive: Option<f64>,
    pub dom_complete: Option<f64>,
}

/// The typed view of a run payload.
///
/// Built field by field from the untyped JSON with [RunPayload::from_json]. Nothing past this
/// boundary needs to look at the raw JSON again.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
    #[serde(rename = "_meta")]
    pub meta: RunMeta,
    /// Page load time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    pub performance: PerformanceTimings,
    /// Periodic JS heap samples, in bytes
    pub memory_usage: Vec<f64>,
    /// Periodic frame rate samples, in frames per second
    pub frame_rate: Vec<f64>,
}

impl RunPayload {
    /// Read a payload from untyped JSON.
    ///
    /// This never fails. Fields that are missing or have the wrong shape are left empty, and
    /// non-numeric entries in the sample arrays are dropped.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let meta = object
            .get("_meta")
            .and_then(Value::as_object)
            .map(|meta| RunMeta {
                implementation: meta
                    .get("implementation")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                instances: meta.get("instances").and_then(number).filter(|n| *n != 0.0),
                timestamp: meta.get("timestamp").and_then(number).filter(|n| *n != 0.0),
            })
            .unwrap_or_default();

        let performance = object
            .get("performance")
            .and_then(Value::as_object)
            .map(|perf| PerformanceTimings {
                first_paint: perf.get("firstPaint").and_then(number),
                first_contentful_paint: perf.get("firstContentfulPaint").and_then(number),
                dom_interactive: perf.get("domInteractive").and_then(number),
                dom_complete: perf.get("domComplete").and_then(number),
            })
            .unwrap_or_default();

        Self {
            meta,
            load_time: object.get("loadTime").and_then(number),
            performance,
            memory_usage: samples(object.get("memoryUsage")),
            frame_rate: samples(object.get("frameRate")),
        }
    }
}

/// Read a finite number from a JSON number or a numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn samples(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(number).collect())
        .unwrap_or_default()
}

/// The file name the instrumentation stores a run under.
///
/// Produces `<implementation>-<instances>-instances-<timestamp>.json`, where the timestamp is in
/// Unix milliseconds.
pub fn run_file_name(implementation: &str, instances: u32, timestamp: i64) -> String {
    format!("{implementation}-{instances}-instances-{timestamp}.json")
}

/// Load a raw run from a reader
///
/// Fails if the reader does not hold a single JSON document.
pub fn load_raw_run<R: Read>(
    source_name: impl Into<String>,
    reader: R,
) -> Result<RawRun, serde_json::Error> {
    let reader = std::io::BufReader::new(reader);
    let payload: Value = serde_json::from_reader(reader)?;
    Ok(RawRun::new(source_name, payload))
}
