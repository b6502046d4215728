//! Column fan-out on a dedicated rayon pool.
//!
//! Every requested column becomes one task over a shared, read-only slice of
//! records. Results are collected back in request order, so the summary is
//! identical to [`summary::summarize`](crate::summary::summarize) for the
//! same input.

use std::{
    num::NonZeroUsize,
    panic::{AssertUnwindSafe, catch_unwind},
    thread,
};

use log::{debug, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    aggregate::ColumnStats,
    record::{AsRecord, ColumnId},
    summary::{ResultSummary, summarize_column},
};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to create worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("worker summarizing column '{column}' panicked: {message}")]
    WorkerPanicked { column: ColumnId, message: String },
}

/// Worker pool sized for one summarize call.
pub struct ColumnPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl ColumnPool {
    /// Builds a pool with `requested` workers, or one per available core.
    /// Never fewer than one, never more than `columns` when that is known.
    pub fn new(
        requested: Option<NonZeroUsize>,
        columns: Option<usize>,
    ) -> Result<Self, SummaryError> {
        let workers = worker_count(requested, columns);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("column-worker-{idx}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Summarizes `columns` concurrently. The first panicking column fails
    /// the whole call.
    pub fn summarize<R>(
        &self,
        records: &[R],
        columns: &[ColumnId],
    ) -> Result<ResultSummary, SummaryError>
    where
        R: AsRecord + Sync,
    {
        info!(
            "Summarizing {} column(s) across {} worker(s)",
            columns.len(),
            self.workers
        );
        let results: Vec<(ColumnId, ColumnStats)> = self.pool.install(|| {
            columns
                .par_iter()
                .map(|column| run_column(records, column))
                .collect::<Result<Vec<_>, _>>()
        })?;
        debug!("Column workers finished {} task(s)", results.len());
        Ok(results.into_iter().collect())
    }
}

fn run_column<R: AsRecord>(
    records: &[R],
    column: &ColumnId,
) -> Result<(ColumnId, ColumnStats), SummaryError> {
    catch_unwind(AssertUnwindSafe(|| summarize_column(records, column)))
        .map(|stats| (column.clone(), stats))
        .map_err(|payload| SummaryError::WorkerPanicked {
            column: column.clone(),
            message: panic_message(payload.as_ref()),
        })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub(crate) fn worker_count(requested: Option<NonZeroUsize>, columns: Option<usize>) -> usize {
    let available = requested
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    match columns {
        Some(columns) => available.min(columns).max(1),
        None => available,
    }
}

/// Parallel counterpart of [`summarize`](crate::summary::summarize).
pub fn summarize_parallel<R>(
    records: &[R],
    columns: &[ColumnId],
    workers: Option<NonZeroUsize>,
) -> Result<ResultSummary, SummaryError>
where
    R: AsRecord + Sync,
{
    ColumnPool::new(workers, Some(columns.len()))?.summarize(records, columns)
}
