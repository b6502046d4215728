use std::{num::NonZeroUsize, path::PathBuf};

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Summarize numeric columns of a weather CSV into JSON",
    long_about = None
)]
pub struct Cli {
    /// Input CSV file with a header row
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Summary JSON file, or a directory to hold summary.json
    #[arg(short = 'o', long = "output", default_value = "dist/summary.json")]
    pub output: PathBuf,
    /// Columns to summarize (defaults to every header); `#N` selects a position
    #[arg(short = 'C', long = "columns", value_delimiter = ',', action = ArgAction::Append)]
    pub columns: Vec<String>,
    /// Use blocking file I/O throughout
    #[arg(long, conflicts_with = "parallel")]
    pub sync: bool,
    /// Fan column statistics out across worker threads
    #[arg(long)]
    pub parallel: bool,
    /// Worker threads for --parallel (defaults to available cores)
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Skip the hot/cold and rainy/dry pattern analysis
    #[arg(long = "no-patterns")]
    pub no_patterns: bool,
    /// MaxTemp above which a day counts as hot
    #[arg(long = "hot-threshold", default_value_t = 25.0)]
    pub hot_threshold: f64,
    /// MaxTemp below which a day counts as cold
    #[arg(long = "cold-threshold", default_value_t = 15.0)]
    pub cold_threshold: f64,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
