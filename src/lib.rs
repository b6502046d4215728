pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod io_utils;
pub mod parallel;
pub mod patterns;
pub mod record;
pub mod rows;
pub mod source;
pub mod stats;
pub mod store;
pub mod summary;
pub mod table;

use std::{env, path::PathBuf, sync::OnceLock, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, error, info, warn};

use crate::{
    cli::Cli,
    config::{ExecutionMode, PipelineConfig},
    patterns::PatternReport,
    source::Dataset,
    store::FileStore,
    summary::ResultSummary,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("weather_summary", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary_path: PathBuf,
    pub summary: ResultSummary,
    pub patterns: Option<PatternReport>,
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = PipelineConfig::from_cli(&cli)?;
    debug!("Resolved configuration: {config:?}");
    execute(&config).map(|_| ())
}

/// Reads, summarizes and saves according to `config.mode`. Returns `None`
/// when the input has no data rows; nothing is written in that case.
pub fn execute(config: &PipelineConfig) -> Result<Option<RunOutcome>> {
    info!(
        "Summarizing '{}' ({} mode)",
        config.input.display(),
        config.mode
    );
    let started = Instant::now();
    let outcome = match config.mode {
        ExecutionMode::Sync => execute_sync(config)?,
        ExecutionMode::Async | ExecutionMode::Parallel => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Starting async runtime")?;
            runtime.block_on(execute_async(config))?
        }
    };
    info!(
        "{} execution time: {:.2}s",
        config.mode,
        started.elapsed().as_secs_f64()
    );
    if let Some(outcome) = &outcome {
        report(outcome);
    }
    Ok(outcome)
}

fn execute_sync(config: &PipelineConfig) -> Result<Option<RunOutcome>> {
    let dataset = source::read_records(&config.input, &config.source)
        .inspect_err(|err| error!("Failed to read CSV: {err:#}"))
        .context("Could not read the CSV. Check the file path and try again")?;
    if no_rows(config, &dataset) {
        return Ok(None);
    }
    let columns = config.resolve_columns(&dataset.headers);
    let summary = summary::summarize(&dataset.records, &columns);
    log_summary(&summary);

    let store = FileStore::new(&config.output)
        .and_then(|store| store.save_summary(&summary).map(|path| (store, path)))
        .inspect_err(|err| error!("Failed to save summary: {err:#}"));
    let (store, summary_path) = store.context("Could not save the summary file")?;

    let patterns = config.patterns.and_then(|thresholds| {
        let report = patterns::analyze(&dataset.records, &thresholds);
        match patterns::save_report(&report, store.out_dir()) {
            Ok(_) => Some(report),
            Err(err) => {
                warn!("Could not write pattern analysis: {err:#}");
                None
            }
        }
    });

    Ok(Some(RunOutcome {
        summary_path,
        summary,
        patterns,
    }))
}

async fn execute_async(config: &PipelineConfig) -> Result<Option<RunOutcome>> {
    let dataset = source::read_records_async(&config.input, &config.source)
        .await
        .inspect_err(|err| error!("Failed to read CSV: {err:#}"))
        .context("Could not read the CSV. Check the file path and try again")?;
    if no_rows(config, &dataset) {
        return Ok(None);
    }
    let columns = config.resolve_columns(&dataset.headers);
    let (dataset, summary) = match config.mode {
        ExecutionMode::Parallel => {
            let workers = config.workers;
            let (dataset, summary) = tokio::task::spawn_blocking(move || {
                let summary = parallel::summarize_parallel(&dataset.records, &columns, workers);
                (dataset, summary)
            })
            .await
            .context("Joining column workers")?;
            let summary = summary
                .inspect_err(|err| error!("Failed to summarize: {err:#}"))
                .context("Something went wrong while summarizing")?;
            (dataset, summary)
        }
        _ => {
            let summary = summary::summarize(&dataset.records, &columns);
            (dataset, summary)
        }
    };
    log_summary(&summary);

    let store = FileStore::new(&config.output)
        .inspect_err(|err| error!("Failed to prepare output: {err:#}"))
        .context("Could not save the summary file")?;
    let patterns_task = async {
        match config.patterns {
            Some(thresholds) => {
                let report = patterns::analyze(&dataset.records, &thresholds);
                patterns::save_report_async(&report, store.out_dir()).await?;
                Ok::<_, anyhow::Error>(Some(report))
            }
            None => Ok(None),
        }
    };
    // Both saves run to completion so each can remove its own temp file.
    let (saved_summary, saved_patterns) =
        tokio::join!(store.save_summary_async(&summary), patterns_task);
    let summary_path = saved_summary
        .inspect_err(|err| error!("Failed to save summary: {err:#}"))
        .context("Could not save the summary file")?;
    let patterns = saved_patterns
        .inspect_err(|err| error!("Failed to save pattern analysis: {err:#}"))
        .context("Could not save the pattern analysis")?;

    Ok(Some(RunOutcome {
        summary_path,
        summary,
        patterns,
    }))
}

fn log_summary(summary: &ResultSummary) {
    info!(
        "Processed {} numeric value(s) across {} column(s)",
        summary.total_count(),
        summary.len()
    );
    let empty = summary.empty_columns().join(", ");
    if !empty.is_empty() {
        info!("No numeric values in: {empty}");
    }
}

fn no_rows(config: &PipelineConfig, dataset: &Dataset) -> bool {
    if dataset.is_empty() {
        println!("No rows found in {}", config.input.display());
        return true;
    }
    false
}

fn report(outcome: &RunOutcome) {
    table::print_table(
        &table::summary_headers(),
        &table::summary_rows(&outcome.summary),
    );
    if let Some(patterns) = &outcome.patterns {
        println!();
        table::print_table(
            &["pattern".to_string(), "value".to_string()],
            &patterns.render_rows(),
        );
    }
    println!("Saved summary to {}", outcome.summary_path.display());
}
