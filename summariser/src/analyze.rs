//! Statistics over numeric series that may contain missing or non-finite values.
//!
//! Every function keeps only the finite values of its input before computing anything, so
//! `None`, NaN and infinities never contribute to a result.

use crate::model::StatBundle;
use polars::prelude::*;

/// Keep only the finite values of a series.
pub fn filter_finite<I>(series: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    series
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect()
}

fn finite_values(series: &[Option<f64>]) -> Float64Chunked {
    Float64Chunked::from_vec("value".into(), filter_finite(series.iter().copied()))
}

/// Interpolated percentile, `p` in `0..=100`.
///
/// The fractional rank is `p / 100 * (n - 1)`. When it falls between two values the result is
/// interpolated linearly between them, so the median of `[1, 2, 3, 4]` is `2.5`.
pub fn percentile(series: &[Option<f64>], p: f64) -> Option<f64> {
    let mut values = filter_finite(series.iter().copied());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let index = (p.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return Some(values[lower]);
    }

    let weight = index.fract();
    Some(values[lower] * (1.0 - weight) + values[upper] * weight)
}

/// Population standard deviation, `None` with fewer than two finite values.
pub fn std_dev(series: &[Option<f64>]) -> Option<f64> {
    let values = finite_values(series);
    if values.len() < 2 {
        return None;
    }
    values.std(0)
}

pub fn min(series: &[Option<f64>]) -> Option<f64> {
    finite_values(series).min()
}

pub fn max(series: &[Option<f64>]) -> Option<f64> {
    finite_values(series).max()
}

/// Arithmetic mean, `None` for a series without finite values.
pub fn mean(series: &[Option<f64>]) -> Option<f64> {
    finite_values(series).mean()
}

pub fn count(series: &[Option<f64>]) -> usize {
    series.iter().flatten().filter(|v| v.is_finite()).count()
}

pub fn stats(series: &[Option<f64>]) -> StatBundle {
    StatBundle {
        p50: percentile(series, 50.0),
        p95: percentile(series, 95.0),
        p99: percentile(series, 99.0),
        std_dev: std_dev(series),
        min: min(series),
        max: max(series),
        count: count(series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn percentile_interpolates_between_neighbours() {
        assert_eq!(percentile(&series(&[1.0, 2.0, 3.0, 4.0]), 50.0), Some(2.5));
        assert_eq!(percentile(&series(&[4.0, 1.0, 3.0, 2.0]), 50.0), Some(2.5));
        assert_eq!(percentile(&series(&[10.0, 20.0, 30.0]), 50.0), Some(20.0));
        // index = 0.95 * 4 = 3.8, between 40 and 50
        let p95 = percentile(&series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 95.0).unwrap();
        assert!((p95 - 48.0).abs() < 1e-9);
    }

    #[test]
    fn percentile_edge_cases() {
        assert_eq!(percentile(&series(&[5.0]), 50.0), Some(5.0));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[None, Some(f64::NAN)], 50.0), None);
        assert_eq!(percentile(&series(&[1.0, 9.0]), 0.0), Some(1.0));
        assert_eq!(percentile(&series(&[1.0, 9.0]), 100.0), Some(9.0));
    }

    #[test]
    fn percentile_does_not_reorder_input() {
        let input = series(&[3.0, 1.0, 2.0]);
        let before = input.clone();
        percentile(&input, 50.0);
        assert_eq!(input, before);
    }

    #[test]
    fn std_dev_is_population() {
        assert_eq!(std_dev(&series(&[2.0, 2.0, 2.0])), Some(0.0));
        // mean 5, squared deviations sum to 32 over 8 values
        let std = std_dev(&series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])).unwrap();
        assert!((std - 2.0).abs() < 1e-9);
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert_eq!(std_dev(&series(&[1.0])), None);
        assert_eq!(std_dev(&[Some(1.0), None, Some(f64::INFINITY)]), None);
    }

    #[test]
    fn min_max_ignore_non_finite() {
        let input = [
            Some(3.0),
            None,
            Some(f64::NEG_INFINITY),
            Some(-1.0),
            Some(f64::NAN),
            Some(8.0),
        ];
        assert_eq!(min(&input), Some(-1.0));
        assert_eq!(max(&input), Some(8.0));
        assert_eq!(min(&[None]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn mean_of_finite_values() {
        assert_eq!(mean(&[Some(1.0), None, Some(2.0)]), Some(1.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn stats_bundle() {
        let bundle = stats(&[Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(bundle.p50, Some(2.5));
        assert_eq!(bundle.min, Some(1.0));
        assert_eq!(bundle.max, Some(4.0));
        assert_eq!(bundle.count, 4);
        assert!(bundle.std_dev.is_some());

        assert_eq!(stats(&[None, Some(f64::NAN)]), StatBundle::default());
    }

    #[test]
    fn stats_are_unchanged_by_prefiltering() {
        let input = [
            Some(7.0),
            None,
            Some(f64::NAN),
            Some(1.5),
            Some(f64::INFINITY),
            Some(-3.25),
            Some(7.0),
        ];
        let filtered: Vec<Option<f64>> = filter_finite(input.iter().copied())
            .into_iter()
            .map(Some)
            .collect();

        assert_eq!(stats(&input), stats(&filtered));
    }
}
