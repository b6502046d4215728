use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{aggregate::ColumnStats, summary::ResultSummary};

pub fn summary_headers() -> Vec<String> {
    ["column", "count", "mean", "median", "mode", "range"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn summary_rows(summary: &ResultSummary) -> Vec<Vec<String>> {
    summary
        .iter()
        .map(|(column, stats)| stats_row(&column.to_string(), stats))
        .collect()
}

fn stats_row(name: &str, stats: &ColumnStats) -> Vec<String> {
    vec![
        name.to_string(),
        stats.count().to_string(),
        format_metric(stats.mean()),
        format_metric(stats.median()),
        format_metric(stats.mode()),
        format_metric(stats.range()),
    ]
}

pub fn format_metric(metric: Option<f64>) -> String {
    metric.map(format_number).unwrap_or_default()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(1))
        .collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", sanitize_cell(value), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_metric_trims_whole_numbers() {
        assert_eq!(format_metric(Some(2.0)), "2");
        assert_eq!(format_metric(Some(2.25)), "2.2500");
        assert_eq!(format_metric(None), "");
    }
}
