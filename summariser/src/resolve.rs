use embed_bench_run_model::RunMeta;
use regex::Regex;
use std::sync::LazyLock;

use crate::model::Implementation;

/// `<implementation>-<instances>-instances-<timestamp>.json`, matched against the lower-cased label.
static STRUCTURED_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(iframe|web-component)-(\d+)-instances-(\d+)\.json$")
        .expect("structured file name pattern is valid")
});

static TRAILING_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.json$").expect("timestamp pattern is valid"));

static JSON_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.json$").expect("extension pattern is valid"));

/// The identity of a run once every source has been consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub implementation: Implementation,
    pub instances: Option<u32>,
    pub timestamp: i64,
}

/// What a single source knows about a run's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCandidate {
    pub implementation: Option<String>,
    pub instances: Option<u32>,
    pub timestamp: Option<i64>,
}

/// Base name of a source, without any directory or query suffix
pub fn file_label(source_name: &str) -> String {
    let base = source_name.rsplit('/').next().unwrap_or(source_name);
    base.split('?').next().unwrap_or_default().trim().to_string()
}

/// Identity from the metadata embedded in the payload.
pub fn embedded_identity(meta: &RunMeta) -> IdentityCandidate {
    IdentityCandidate {
        implementation: meta.implementation.as_deref().map(str::to_lowercase),
        instances: meta.instances.and_then(instance_count),
        timestamp: meta.timestamp.and_then(epoch_millis),
    }
}

/// Identity from a file label that follows the storage naming convention exactly.
pub fn structured_file_identity(label: &str) -> IdentityCandidate {
    let label = label.to_lowercase();
    let Some(captures) = STRUCTURED_FILE_NAME.captures(&label) else {
        return IdentityCandidate::default();
    };

    IdentityCandidate {
        implementation: Some(captures[1].to_string()),
        instances: captures[2].parse().ok(),
        timestamp: captures[3].parse().ok(),
    }
}

/// Identity from a loosely named file.
///
/// The first `-` separated token is the implementation, the second is the instance count and any
/// digits right before `.json` are the timestamp.
pub fn loose_file_identity(label: &str) -> IdentityCandidate {
    let stem = JSON_EXTENSION.replace(label, "");
    let mut parts = stem.split('-');

    let implementation = parts
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let instances = parts.next().and_then(|s| s.trim().parse().ok());
    let timestamp = TRAILING_TIMESTAMP
        .captures(label)
        .and_then(|c| c[1].parse().ok());

    IdentityCandidate {
        implementation,
        instances,
        timestamp,
    }
}

fn instance_count(value: f64) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64).then_some(value as u32)
}

fn epoch_millis(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() <= i64::MAX as f64).then_some(value.trunc() as i64)
}

/// Resolves the identity of runs for a single reload.
///
/// Every field is resolved on its own: the first source that supplies a value for it wins, in the
/// order embedded metadata, structured file name, loose file name. A run with no timestamp
/// anywhere falls back to `resolved_at`.
#[derive(Debug, Clone, Copy)]
pub struct MetadataResolver {
    resolved_at: i64,
}

impl MetadataResolver {
    pub fn new(resolved_at: i64) -> Self {
        Self { resolved_at }
    }

    pub fn resolved_at(&self) -> i64 {
        self.resolved_at
    }

    pub fn resolve(&self, meta: &RunMeta, label: &str) -> ResolvedIdentity {
        let embedded = embedded_identity(meta);
        let candidates = if embedded.implementation.is_some()
            && embedded.instances.is_some()
            && embedded.timestamp.is_some()
        {
            vec![embedded]
        } else {
            log::debug!("Incomplete metadata for {label}, falling back to the file name");
            vec![
                embedded,
                structured_file_identity(label),
                loose_file_identity(label),
            ]
        };

        let implementation =
            Implementation::normalize(candidates.iter().find_map(|c| c.implementation.as_deref()));
        if implementation == Implementation::Unknown {
            log::warn!("Could not resolve a known implementation for {label}");
        }

        let instances = candidates.iter().find_map(|c| c.instances);
        let timestamp = candidates
            .iter()
            .find_map(|c| c.timestamp)
            .unwrap_or_else(|| {
                log::debug!("No timestamp for {label}, using resolution time");
                self.resolved_at
            });

        ResolvedIdentity {
            implementation,
            instances,
            timestamp,
        }
    }
}
