use std::path::PathBuf;

use clap::Parser;
use embed_bench_summariser::filter::{ImplementationSelector, InstanceSelector};

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Directory holding the stored run files.
    #[arg(long, env = "RUN_DATA_DIR", default_value = "dashboard/data")]
    pub data_dir: PathBuf,

    /// Only show runs of this implementation: iframe, web-component, unknown or all.
    ///
    /// The comparison between implementations always covers every run.
    #[arg(long, default_value = "all")]
    pub implementation: ImplementationSelector,

    /// Only show runs with this instance count, or all.
    #[arg(long, default_value = "all")]
    pub instances: InstanceSelector,

    /// Path to write the JSON report to.
    ///
    /// Defaults to `embed-bench-report-<timestamp>.json` in the working directory.
    #[arg(long, env = "REPORT_PATH")]
    pub output: Option<PathBuf>,

    /// Do not print the summary tables.
    #[arg(long, default_value = "false")]
    pub no_table: bool,
}
