use crate::analyze::stats;
use crate::collection::RunCollection;
use crate::filter::{select_runs, RunSelection};
use crate::model::{Metric, RunRecord, RunsSummary, SummaryOutput};

pub mod analyze;
pub mod collection;
pub mod compare;
pub mod filter;
pub mod model;
pub mod partition;
pub mod resolve;
pub mod store;
pub mod summary;
pub mod table;

/// Summary statistics over a selection of runs.
pub fn summarize_selection(runs: &[&RunRecord]) -> RunsSummary {
    let series = |metric: Metric| {
        stats(
            &runs
                .iter()
                .map(|record| record.metric(metric))
                .collect::<Vec<_>>(),
        )
    };

    RunsSummary {
        total_runs: runs.len(),
        load_time: series(Metric::LoadTime),
        fcp: series(Metric::Fcp),
        avg_mem_mb: series(Metric::AvgMemMb),
        avg_fps: series(Metric::AvgFps),
    }
}

/// Build the report for a loaded collection.
///
/// The runs and their summary follow `selection`, the comparison always covers the whole
/// collection.
pub fn build_report(
    collection: &RunCollection,
    selection: &RunSelection,
    generated_at: i64,
) -> SummaryOutput {
    let runs = select_runs(collection, selection);
    log::debug!(
        "Selected {} of {} runs for {selection:?}",
        runs.len(),
        collection.len()
    );

    SummaryOutput {
        generated_at,
        selection: *selection,
        summary: summarize_selection(&runs),
        runs: runs.into_iter().cloned().collect(),
        comparison: compare::compare_collection(collection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::record;
    use crate::filter::{ImplementationSelector, InstanceSelector};
    use crate::model::{Implementation, StatBundle};

    #[test]
    fn summary_of_no_runs_is_empty() {
        let summary = summarize_selection(&[]);
        assert_eq!(summary.total_runs, 0);
        assert_eq!(summary.load_time, StatBundle::default());
        assert_eq!(summary.avg_fps, StatBundle::default());
    }

    #[test]
    fn summary_skips_missing_metrics() {
        let mut with_fps = record(Implementation::Iframe, Some(1), 1);
        with_fps.avg_fps = Some(60.0);
        let without_fps = record(Implementation::Iframe, Some(1), 2);

        let summary = summarize_selection(&[&with_fps, &without_fps]);

        assert_eq!(summary.total_runs, 2);
        assert_eq!(summary.load_time.count, 2);
        assert_eq!(summary.avg_fps.count, 1);
        assert_eq!(summary.avg_fps.p50, Some(60.0));
        assert_eq!(summary.fcp.count, 0);
    }

    #[test]
    fn report_filters_runs_but_compares_everything() {
        let collection = RunCollection::from_records(vec![
            record(Implementation::Iframe, Some(1), 1),
            record(Implementation::WebComponent, Some(1), 2),
            record(Implementation::WebComponent, Some(5), 3),
        ]);
        let selection = RunSelection::new(
            ImplementationSelector::Only(Implementation::Iframe),
            InstanceSelector::All,
        );

        let report = build_report(&collection, &selection, 42);

        assert_eq!(report.generated_at, 42);
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.summary.total_runs, 1);
        assert_eq!(report.comparison.len(), 2 * Metric::ALL.len());
    }
}
