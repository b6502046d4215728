//! Per-column statistics.
//!
//! [`ColumnStats`] keeps its fields private so the count/None invariant can
//! only be established by [`ColumnStats::empty`], [`ColumnStats::from_values`]
//! or a checked deserialization: the numeric fields are absent exactly when
//! `count == 0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{mean_of, median_of_sorted, mode_of_sorted};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsInvariantError {
    #[error("count is {count} but {field} is missing")]
    MissingField { field: &'static str, count: u64 },
    #[error("count is 0 but {field} is present")]
    UnexpectedField { field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumnStats")]
pub struct ColumnStats {
    mean: Option<f64>,
    median: Option<f64>,
    mode: Option<f64>,
    data_range: Option<f64>,
    count: u64,
}

impl ColumnStats {
    pub fn empty() -> Self {
        Self {
            mean: None,
            median: None,
            mode: None,
            data_range: None,
            count: 0,
        }
    }

    /// Summarizes `values`, sorting them in place first.
    pub fn from_values(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let first = values[0];
        let last = values[count - 1];
        Self {
            mean: Some(mean_of(&values)),
            median: Some(median_of_sorted(&values)),
            mode: mode_of_sorted(&values),
            data_range: Some(last - first),
            count: count as u64,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub fn median(&self) -> Option<f64> {
        self.median
    }

    pub fn mode(&self) -> Option<f64> {
        self.mode
    }

    pub fn range(&self) -> Option<f64> {
        self.data_range
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wire form; `range` is accepted as an alias of `data_range`.
#[derive(Deserialize)]
struct RawColumnStats {
    mean: Option<f64>,
    median: Option<f64>,
    mode: Option<f64>,
    #[serde(alias = "range")]
    data_range: Option<f64>,
    count: u64,
}

impl TryFrom<RawColumnStats> for ColumnStats {
    type Error = StatsInvariantError;

    fn try_from(raw: RawColumnStats) -> Result<Self, Self::Error> {
        let fields = [
            ("mean", raw.mean),
            ("median", raw.median),
            ("mode", raw.mode),
            ("data_range", raw.data_range),
        ];
        for (field, value) in fields {
            match (raw.count, value) {
                (0, Some(_)) => return Err(StatsInvariantError::UnexpectedField { field }),
                (count, None) if count > 0 => {
                    return Err(StatsInvariantError::MissingField { field, count });
                }
                _ => {}
            }
        }
        Ok(Self {
            mean: raw.mean,
            median: raw.median,
            mode: raw.mode,
            data_range: raw.data_range,
            count: raw.count,
        })
    }
}

/// Aggregates one column's numeric values.
pub fn aggregate<I>(values: I) -> ColumnStats
where
    I: IntoIterator<Item = f64>,
{
    ColumnStats::from_values(values.into_iter().collect())
}
