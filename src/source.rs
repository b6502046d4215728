//! Weather files as keyed records.
//!
//! The header row is mandatory and names every column; each later row
//! becomes a [`WeatherRecord`] keyed by those names, with cells trimmed.
//! Rows in which every cell is blank are skipped. Both the blocking and the
//! tokio readers share one parser, so they produce identical datasets.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader, Cursor, Read},
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{io_utils, record::WeatherRecord};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("CSV not found: {0:?}")]
    NotFound(PathBuf),
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV header row is missing or unreadable in {0:?}")]
    MissingHeader(PathBuf),
    #[error("failed to decode line {line} with encoding {encoding}")]
    Decode { line: u64, encoding: &'static str },
    #[error("CSV parse error")]
    Csv(#[from] csv::Error),
    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("background reader failed")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct SourceOptions {
    /// Overrides the extension-based delimiter.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Header names in file order.
    pub headers: Vec<String>,
    pub records: Vec<WeatherRecord>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

pub fn read_records(path: &Path, options: &SourceOptions) -> Result<Dataset, SourceError> {
    if !path.exists() {
        error!("CSV file not found: {path:?}");
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_records(BufReader::new(file), path, options)?;
    info!("Read {} record(s) from {path:?}", dataset.len());
    Ok(dataset)
}

/// Reads the file without blocking the runtime and parses it on the
/// blocking pool.
pub async fn read_records_async(
    path: &Path,
    options: &SourceOptions,
) -> Result<Dataset, SourceError> {
    let owned = path.to_path_buf();
    let bytes = match tokio::fs::read(&owned).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            error!("CSV file not found: {owned:?}");
            return Err(SourceError::NotFound(owned));
        }
        Err(source) => return Err(SourceError::Io { path: owned, source }),
    };
    let options = *options;
    let dataset = tokio::task::spawn_blocking(move || {
        parse_records(Cursor::new(bytes), &owned, &options)
    })
    .await??;
    info!("Read {} record(s) from {path:?}", dataset.len());
    Ok(dataset)
}

/// Parses delimited text from any reader; `path` only informs delimiter
/// detection and error messages.
pub fn parse_records<R>(
    reader: R,
    path: &Path,
    options: &SourceOptions,
) -> Result<Dataset, SourceError>
where
    R: Read,
{
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    debug!(
        "Parsing {path:?} with delimiter '{}' and encoding {}",
        io_utils::printable_delimiter(delimiter),
        options.encoding.name()
    );
    let mut reader = io_utils::open_csv_reader(reader, delimiter, true);
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?
        .into_iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();
    if headers.iter().all(|header| header.is_empty()) {
        error!("CSV header row is missing or unreadable in {path:?}");
        return Err(SourceError::MissingHeader(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(row_idx as u64 + 2);
        let decoded = io_utils::decode_record(&record, options.encoding, line)?;
        if decoded.iter().all(|cell| cell.trim().is_empty()) {
            warn!("Skipping empty row at line {line}");
            continue;
        }
        let row = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let cell = decoded.get(idx).map(|cell| cell.trim()).unwrap_or("");
                (header.clone(), cell.to_string())
            })
            .collect::<HashMap<_, _>>();
        records.push(WeatherRecord::new(row));
    }
    Ok(Dataset { headers, records })
}
