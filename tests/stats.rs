use proptest::prelude::*;
use weather_summary::{
    aggregate::{ColumnStats, aggregate},
    stats::{self, StatsError},
};

#[test]
fn mean_median_mode_range_of_small_column() {
    let values = [1.0, 2.0, 3.0];
    assert_eq!(stats::mean(&values), Ok(2.0));
    assert_eq!(stats::median(&values), Ok(2.0));
    assert_eq!(stats::mode(&values), Ok(1.0));
    assert_eq!(stats::data_range(&values), Ok(2.0));
}

#[test]
fn median_uses_two_case_definition() {
    assert_eq!(stats::median(&[1.0, 3.0, 5.0]), Ok(3.0));
    assert_eq!(stats::median(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
}

#[test]
fn mean_and_range_of_signed_values() {
    assert_eq!(stats::mean(&[-1.0, 1.0]), Ok(0.0));
    assert_eq!(stats::data_range(&[1.0, 9.0, 4.0]), Ok(8.0));
}

#[test]
fn mode_prefers_most_frequent_then_smallest() {
    assert_eq!(stats::mode(&[1.0, 1.0, 2.0, 2.0]), Ok(1.0));
    assert_eq!(stats::mode(&[3.0, 1.0, 3.0, 2.0]), Ok(3.0));
    assert_eq!(stats::mode(&[5.0, 2.0, 5.0, 2.0, 9.0]), Ok(2.0));
}

#[test]
fn empty_input_is_an_error() {
    assert_eq!(stats::mean(&[]), Err(StatsError::EmptySequence));
    assert_eq!(stats::median(&[]), Err(StatsError::EmptySequence));
    assert_eq!(stats::mode(&[]), Err(StatsError::EmptySequence));
    assert_eq!(stats::data_range(&[]), Err(StatsError::EmptySequence));
}

#[test]
fn aggregate_of_nothing_is_empty() {
    let stats = aggregate(std::iter::empty::<f64>());
    assert_eq!(stats, ColumnStats::empty());
    assert_eq!(stats.count(), 0);
    assert!(stats.mean().is_none() && stats.range().is_none());
}

#[test]
fn aggregate_accepts_any_order() {
    let stats = aggregate([9.0, -1.0, 4.0, 4.0]);
    assert_eq!(stats.count(), 4);
    assert_eq!(stats.mean(), Some(4.0));
    assert_eq!(stats.median(), Some(4.0));
    assert_eq!(stats.mode(), Some(4.0));
    assert_eq!(stats.range(), Some(10.0));
}

#[test]
fn describe_matches_aggregate() {
    let values = vec![2.5, 0.5, 1.5];
    assert_eq!(stats::describe(values.clone()), aggregate(values));
}

proptest! {
    #[test]
    fn aggregate_counts_and_bounds_every_value(
        values in proptest::collection::vec(-1.0e6f64..1.0e6, 1..200)
    ) {
        let stats = aggregate(values.iter().copied());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert_eq!(stats.count(), values.len() as u64);
        prop_assert_eq!(stats.range(), Some(max - min));
        let median = stats.median().expect("median");
        prop_assert!(median >= min && median <= max);
        let mean = stats.mean().expect("mean");
        let expected_mean = values.iter().sum::<f64>() / values.len() as f64;
        prop_assert!((mean - expected_mean).abs() <= 1e-6);
        prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);

        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let expected_median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        prop_assert_eq!(median, expected_median);
        prop_assert!(values.contains(&stats.mode().expect("mode")));
    }

    #[test]
    fn mode_is_never_less_frequent_than_any_value(
        values in proptest::collection::vec(0u8..6, 1..60)
    ) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let mode = stats::mode(&values).expect("mode");
        let frequency = |target: f64| values.iter().filter(|v| **v == target).count();
        for value in &values {
            prop_assert!(frequency(mode) > frequency(*value)
                || (frequency(mode) == frequency(*value) && mode <= *value));
        }
    }
}
