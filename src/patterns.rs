//! Hot/cold and rainy/dry pattern analysis over weather records.
//!
//! These are the figures the comparison charts are drawn from. They are
//! persisted as `patterns.json` beside the summary and printed as a table.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    record::WeatherRecord,
    rows::cell_value,
    store::{write_json_atomic, write_json_atomic_async},
};

pub const PATTERNS_FILE_NAME: &str = "patterns.json";

const MAX_TEMP: &str = "MaxTemp";
const MIN_TEMP: &str = "MinTemp";
const RAINFALL: &str = "Rainfall";
const RAIN_TODAY: &str = "RainToday";

const VERY_HOT_THRESHOLD: f64 = 30.0;
const MODERATE_LOW: f64 = 15.0;
const MODERATE_HIGH: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternThresholds {
    /// Days with `MaxTemp` strictly above this are hot.
    pub hot: f64,
    /// Days with `MaxTemp` strictly below this are cold.
    pub cold: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            hot: 25.0,
            cold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotColdAnalysis {
    pub hot_day_count: usize,
    pub cold_day_count: usize,
    pub average_hot_temp: f64,
    pub average_cold_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainyDryAnalysis {
    pub rainy_day_count: usize,
    pub dry_day_count: usize,
    pub total_rainfall: f64,
    pub average_rainy_temp: f64,
    pub average_dry_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub total_records: usize,
    pub overall_average_temp: f64,
    pub hot_cold: HotColdAnalysis,
    pub rainy_dry: RainyDryAnalysis,
    pub very_hot_days: usize,
    pub moderate_days: usize,
}

fn max_temp(record: &WeatherRecord) -> Option<f64> {
    cell_value(record.get(MAX_TEMP))
}

pub fn hot_days(records: &[WeatherRecord], threshold: f64) -> Vec<&WeatherRecord> {
    records
        .iter()
        .filter(|record| max_temp(record).is_some_and(|temp| temp > threshold))
        .collect()
}

pub fn cold_days(records: &[WeatherRecord], threshold: f64) -> Vec<&WeatherRecord> {
    records
        .iter()
        .filter(|record| max_temp(record).is_some_and(|temp| temp < threshold))
        .collect()
}

pub fn rainy_days(records: &[WeatherRecord]) -> Vec<&WeatherRecord> {
    records
        .iter()
        .filter(|record| record.get(RAIN_TODAY).trim() == "Yes")
        .collect()
}

pub fn dry_days(records: &[WeatherRecord]) -> Vec<&WeatherRecord> {
    records
        .iter()
        .filter(|record| record.get(RAIN_TODAY).trim() == "No")
        .collect()
}

/// One value per record; missing or unparseable cells count as `0.0`.
fn extract<'a, I>(records: I, column: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    records
        .into_iter()
        .map(|record| cell_value(record.get(column)).unwrap_or(0.0))
        .collect()
}

pub fn max_temps<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    extract(records, MAX_TEMP)
}

pub fn min_temps<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    extract(records, MIN_TEMP)
}

pub fn rainfall<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    extract(records, RAINFALL)
}

pub fn total_rainfall(amounts: &[f64]) -> f64 {
    amounts.iter().fold(0.0, |total, amount| total + amount)
}

/// Arithmetic mean, `0.0` for no temperatures.
pub fn average_temp(temps: &[f64]) -> f64 {
    if temps.is_empty() {
        return 0.0;
    }
    temps.iter().sum::<f64>() / temps.len() as f64
}

pub fn count_days_above(temps: &[f64], threshold: f64) -> usize {
    temps.iter().filter(|temp| **temp > threshold).count()
}

pub fn hot_cold_analysis(
    records: &[WeatherRecord],
    thresholds: &PatternThresholds,
) -> HotColdAnalysis {
    let hot = hot_days(records, thresholds.hot);
    let cold = cold_days(records, thresholds.cold);
    HotColdAnalysis {
        hot_day_count: hot.len(),
        cold_day_count: cold.len(),
        average_hot_temp: average_temp(&max_temps(hot)),
        average_cold_temp: average_temp(&max_temps(cold)),
    }
}

pub fn rainy_dry_analysis(records: &[WeatherRecord]) -> RainyDryAnalysis {
    let rainy = rainy_days(records);
    let dry = dry_days(records);
    RainyDryAnalysis {
        rainy_day_count: rainy.len(),
        dry_day_count: dry.len(),
        total_rainfall: total_rainfall(&rainfall(rainy.iter().copied())),
        average_rainy_temp: average_temp(&max_temps(rainy)),
        average_dry_temp: average_temp(&max_temps(dry)),
    }
}

pub fn analyze(records: &[WeatherRecord], thresholds: &PatternThresholds) -> PatternReport {
    let all_max = max_temps(records);
    PatternReport {
        total_records: records.len(),
        overall_average_temp: average_temp(&all_max),
        hot_cold: hot_cold_analysis(records, thresholds),
        rainy_dry: rainy_dry_analysis(records),
        very_hot_days: count_days_above(&all_max, VERY_HOT_THRESHOLD),
        moderate_days: all_max
            .iter()
            .filter(|temp| (MODERATE_LOW..=MODERATE_HIGH).contains(*temp))
            .count(),
    }
}

impl PatternReport {
    pub fn render_rows(&self) -> Vec<Vec<String>> {
        let rows: [(&str, String); 11] = [
            ("Total records", self.total_records.to_string()),
            (
                "Average max temperature",
                format!("{:.1}", self.overall_average_temp),
            ),
            ("Hot days", self.hot_cold.hot_day_count.to_string()),
            ("Cold days", self.hot_cold.cold_day_count.to_string()),
            ("Very hot days (>30)", self.very_hot_days.to_string()),
            ("Moderate days (15-25)", self.moderate_days.to_string()),
            ("Rainy days", self.rainy_dry.rainy_day_count.to_string()),
            ("Dry days", self.rainy_dry.dry_day_count.to_string()),
            (
                "Total rainfall",
                format!("{:.1}", self.rainy_dry.total_rainfall),
            ),
            (
                "Average temperature on rainy days",
                format!("{:.1}", self.rainy_dry.average_rainy_temp),
            ),
            (
                "Average temperature on dry days",
                format!("{:.1}", self.rainy_dry.average_dry_temp),
            ),
        ];
        rows.into_iter()
            .map(|(label, value)| vec![label.to_string(), value])
            .collect()
    }
}

pub fn save_report(report: &PatternReport, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(PATTERNS_FILE_NAME);
    write_json_atomic(&path, report)?;
    info!("Wrote pattern analysis to {path:?}");
    Ok(path)
}

pub fn load_report(path: &Path) -> Result<PatternReport> {
    let file = File::open(path).with_context(|| format!("Opening pattern report {path:?}"))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing pattern report {path:?}"))
}

pub async fn save_report_async(report: &PatternReport, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(PATTERNS_FILE_NAME);
    write_json_atomic_async(&path, report).await?;
    info!("Wrote pattern analysis to {path:?}");
    Ok(path)
}
