use embed_bench_run_model::{load_raw_run, RawRun};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to list runs: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read run {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Run {path:?} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Somewhere stored runs can be loaded from.
///
/// A load returns every run or fails as a whole.
pub trait RunStore {
    fn load_runs(&self) -> Result<Vec<RawRun>, StoreError>;
}

/// Loads the `.json` run files stored directly in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryRunStore {
    dir: PathBuf,
}

impl DirectoryRunStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_run_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl RunStore for DirectoryRunStore {
    fn load_runs(&self) -> Result<Vec<RawRun>, StoreError> {
        log::debug!("Listing runs in {}", self.dir.display());

        let mut runs = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_run_file(entry.path()) {
                continue;
            }

            let path = entry.path();
            let file = std::fs::File::open(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let source_name = entry.file_name().to_string_lossy().into_owned();
            let run = load_raw_run(source_name, file).map_err(|source| {
                if source.is_io() {
                    StoreError::Io {
                        path: path.to_path_buf(),
                        source: source.into(),
                    }
                } else {
                    StoreError::Json {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;

            log::trace!("Loaded run {}", run.source_name);
            runs.push(run);
        }

        if runs.is_empty() {
            log::warn!("No run files found in {}", self.dir.display());
        }

        Ok(runs)
    }
}
