use anyhow::Context;
use chrono::Utc;
use clap::Parser as _;
use embed_bench_summariser::collection::Reloader;
use embed_bench_summariser::filter::RunSelection;
use embed_bench_summariser::store::DirectoryRunStore;
use embed_bench_summariser::{build_report, table};
use log::{debug, info};
use std::fs::File;
use std::path::PathBuf;

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli::CliArgs::parse();
    info!("Using run data directory: {}", args.data_dir.display());

    let mut reloader = Reloader::new(DirectoryRunStore::new(&args.data_dir));
    let collection = reloader
        .reload()
        .with_context(|| format!("Error loading data from {}", args.data_dir.display()))?;
    info!("Loaded {} runs", collection.len());

    let selection = RunSelection::new(args.implementation, args.instances);
    let generated_at = Utc::now();
    let report = build_report(collection, &selection, generated_at.timestamp_millis());

    if !args.no_table {
        println!("\nRuns ({} of {})", report.runs.len(), collection.len());
        println!(
            "{}",
            table::runs_table(&report.runs.iter().collect::<Vec<_>>())
        );
        println!("\nSummary");
        println!("{}", table::summary_table(&report.summary));
        println!("\nComparison (all runs)");
        println!("{}", table::comparison_table(&report.comparison));
    }

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "embed-bench-report-{}.json",
            generated_at.format("%Y-%m-%dT%H.%M.%S%.fZ")
        ))
    });
    debug!("Writing report to {}", output.display());
    let file = File::create(&output)
        .with_context(|| format!("Failed to create report file {}", output.display()))?;
    serde_json::to_writer_pretty(file, &report)?;
    info!("Report written to {}", output.display());

    Ok(())
}
