//! JSON persistence for summaries and pattern reports.
//!
//! Every write goes to `<file>.tmp` first and is renamed over the final
//! path, so a failed write never leaves a truncated file behind.

use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{error, info};
use serde::Serialize;

use crate::summary::ResultSummary;

pub const SUMMARY_FILE_NAME: &str = "summary.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    out_file: PathBuf,
}

impl FileStore {
    /// `output` without an extension is treated as a directory holding
    /// `summary.json`. Missing parent directories are created.
    pub fn new(output: impl Into<PathBuf>) -> Result<Self> {
        let output = output.into();
        let out_file = if output.extension().is_some() {
            output
        } else {
            output.join(SUMMARY_FILE_NAME)
        };
        if let Some(parent) = out_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output directory {parent:?}"))?;
        }
        Ok(Self { out_file })
    }

    pub fn out_file(&self) -> &Path {
        &self.out_file
    }

    /// Directory the summary lands in; sibling artifacts go here too.
    pub fn out_dir(&self) -> &Path {
        self.out_file.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn save_summary(&self, summary: &ResultSummary) -> Result<PathBuf> {
        write_json_atomic(&self.out_file, summary)?;
        info!("Wrote summary to {:?}", self.out_file);
        Ok(self.out_file.clone())
    }

    pub async fn save_summary_async(&self, summary: &ResultSummary) -> Result<PathBuf> {
        write_json_atomic_async(&self.out_file, summary).await?;
        info!("Wrote summary to {:?}", self.out_file);
        Ok(self.out_file.clone())
    }
}

pub fn load_summary(path: &Path) -> Result<ResultSummary> {
    let file = File::open(path).with_context(|| format!("Opening summary file {path:?}"))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing summary JSON {path:?}"))
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let payload = serde_json::to_vec_pretty(value).context("Serializing JSON payload")?;
    let tmp = temp_path(path);
    let written = fs::write(&tmp, &payload)
        .with_context(|| format!("Writing temporary file {tmp:?}"))
        .and_then(|()| {
            fs::rename(&tmp, path).with_context(|| format!("Replacing {path:?} with {tmp:?}"))
        });
    if let Err(err) = &written {
        error!("Failed to write {path:?}: {err:#}");
        let _ = fs::remove_file(&tmp);
    }
    written
}

pub async fn write_json_atomic_async<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec_pretty(value).context("Serializing JSON payload")?;
    let tmp = temp_path(path);
    let written = match tokio::fs::write(&tmp, &payload).await {
        Ok(()) => tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Replacing {path:?} with {tmp:?}")),
        Err(err) => Err(err).with_context(|| format!("Writing temporary file {tmp:?}")),
    };
    if let Err(err) = &written {
        error!("Failed to write {path:?}: {err:#}");
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
