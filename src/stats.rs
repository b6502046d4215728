//! Descriptive statistics over an already-numeric sequence.

use std::cmp::Ordering;

use itertools::Itertools;
use thiserror::Error;

use crate::aggregate::{ColumnStats, aggregate};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("statistic requires at least one value")]
    EmptySequence,
}

pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySequence);
    }
    Ok(mean_of(values))
}

pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySequence);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(median_of_sorted(&sorted))
}

/// Most frequent value. Ties go to the smallest value, so a sequence
/// without repeats yields its minimum.
pub fn mode(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySequence);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    mode_of_sorted(&sorted).ok_or(StatsError::EmptySequence)
}

pub fn data_range(values: &[f64]) -> Result<f64, StatsError> {
    let (min, max) = values
        .iter()
        .copied()
        .minmax_by(f64::total_cmp)
        .into_option()
        .ok_or(StatsError::EmptySequence)?;
    Ok(max - min)
}

/// One-stop summary of a sequence; empty input gives the count-0 summary.
pub fn describe<I>(values: I) -> ColumnStats
where
    I: IntoIterator<Item = f64>,
{
    aggregate(values)
}

/// Mean of a non-empty slice. Falls back to summing scaled terms when the
/// plain sum overflows, so `[1e308, 1e308]` averages to `1e308`.
pub(crate) fn mean_of(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|value| value / n).sum()
    }
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        let sum = low + high;
        if sum.is_finite() { sum / 2.0 } else { low / 2.0 + high / 2.0 }
    } else {
        sorted[mid]
    }
}

pub(crate) fn mode_of_sorted(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    for (key, run) in &sorted
        .iter()
        .chunk_by(|value| OrderedKey(**value))
    {
        let frequency = run.count();
        // Runs arrive in ascending order, so only a strictly larger run wins.
        if best.is_none_or(|(_, top)| frequency > top) {
            best = Some((key.0, frequency));
        }
    }
    best.map(|(value, _)| value)
}

/// Groups values by `total_cmp` equality so repeated NaNs form one run.
#[derive(Clone, Copy)]
struct OrderedKey(f64);

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}
