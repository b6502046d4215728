//! Resolved run configuration.
//!
//! [`PipelineConfig`] is built once from the command line and handed to the
//! pipeline; nothing below it reads arguments or environment directly.

use std::{fmt, num::NonZeroUsize, path::PathBuf};

use anyhow::Result;

use crate::{
    cli::Cli,
    io_utils,
    patterns::PatternThresholds,
    record::ColumnId,
    source::SourceOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Non-blocking file I/O, sequential statistics.
    Async,
    /// Blocking file I/O, sequential statistics.
    Sync,
    /// Non-blocking file I/O, one worker task per column.
    Parallel,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutionMode::Async => "async",
            ExecutionMode::Sync => "sync",
            ExecutionMode::Parallel => "async + parallel",
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source: SourceOptions,
    /// Explicit column selection; `None` means every header.
    pub columns: Option<Vec<ColumnId>>,
    pub mode: ExecutionMode,
    pub workers: Option<NonZeroUsize>,
    /// `None` disables pattern analysis.
    pub patterns: Option<PatternThresholds>,
}

impl PipelineConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let encoding = io_utils::resolve_encoding(cli.input_encoding.as_deref())?;
        let columns = cli
            .columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(ColumnId::parse)
            .collect::<Vec<_>>();
        let mode = if cli.sync {
            ExecutionMode::Sync
        } else if cli.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Async
        };
        Ok(Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            source: SourceOptions {
                delimiter: cli.delimiter,
                encoding,
            },
            columns: (!columns.is_empty()).then_some(columns),
            mode,
            workers: cli.workers,
            patterns: (!cli.no_patterns).then_some(PatternThresholds {
                hot: cli.hot_threshold,
                cold: cli.cold_threshold,
            }),
        })
    }

    /// Requested columns, falling back to the file's headers in order.
    pub fn resolve_columns(&self, headers: &[String]) -> Vec<ColumnId> {
        match &self.columns {
            Some(columns) => columns.clone(),
            None => headers.iter().cloned().map(ColumnId::Name).collect(),
        }
    }
}
