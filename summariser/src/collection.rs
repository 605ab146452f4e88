use embed_bench_run_model::RawRun;

use crate::model::RunRecord;
use crate::resolve::MetadataResolver;
use crate::store::{RunStore, StoreError};
use crate::summary::summarize_run;

/// All loaded runs, most recent first.
///
/// A collection is never modified once built. Reloading builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCollection {
    records: Vec<RunRecord>,
}

impl RunCollection {
    /// Build a collection from records in any order.
    ///
    /// Records are sorted by descending timestamp. The sort is stable, so records with equal
    /// timestamps keep their relative order.
    pub fn from_records(mut records: Vec<RunRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { records }
    }

    /// Summarize a batch of raw runs. Runs without a timestamp get `resolved_at`.
    pub fn from_raw_runs<I>(runs: I, resolved_at: i64) -> Self
    where
        I: IntoIterator<Item = RawRun>,
    {
        let resolver = MetadataResolver::new(resolved_at);
        Self::from_records(
            runs.into_iter()
                .map(|raw| summarize_run(&raw, &resolver))
                .collect(),
        )
    }

    /// Load every run from the store.
    ///
    /// Either the whole batch is loaded or an error is returned, there is no partial collection.
    pub fn load<S: RunStore>(store: &S, resolved_at: i64) -> Result<Self, StoreError> {
        let runs = store.load_runs()?;
        log::debug!("Loaded {} raw runs", runs.len());
        Ok(Self::from_raw_runs(runs, resolved_at))
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RunCollection {
    type Item = &'a RunRecord;
    type IntoIter = std::slice::Iter<'a, RunRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keeps the latest successfully loaded [RunCollection] for a store.
pub struct Reloader<S> {
    store: S,
    current: Option<RunCollection>,
    last_error: Option<String>,
}

impl<S: RunStore> Reloader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
            last_error: None,
        }
    }

    /// Reload using the current wall clock time as the resolution time.
    pub fn reload(&mut self) -> Result<&RunCollection, StoreError> {
        self.reload_at(chrono::Utc::now().timestamp_millis())
    }

    /// Replace the current collection with a fresh load from the store.
    ///
    /// On failure the previous collection stays available from [Reloader::current].
    pub fn reload_at(&mut self, resolved_at: i64) -> Result<&RunCollection, StoreError> {
        match RunCollection::load(&self.store, resolved_at) {
            Ok(collection) => {
                self.last_error = None;
                Ok(self.current.insert(collection))
            }
            Err(e) => {
                log::error!("Failed to reload runs: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The latest loaded collection, `None` if nothing has loaded yet
    pub fn current(&self) -> Option<&RunCollection> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
