#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use weather_summary::record::WeatherRecord;

pub const WEATHER_CSV: &str = "\
Date,Location,MinTemp,MaxTemp,Rainfall,RainToday
2008-12-01,Albury,13.4,30.0,0.6,No
2008-12-02,Albury,7.4,10.0,5.5,Yes
2008-12-03,Albury,12.9,28.0,0,No
2008-12-04,Albury,9.2,8.0,12.3,Yes
2008-12-05,Albury,17.5,20.0,NA,No
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    pub fn weather_csv(&self) -> PathBuf {
        self.write("weather.csv", WEATHER_CSV)
    }
}

/// Five days: two hot, two cold, two rainy, three dry.
pub fn sample_records() -> Vec<WeatherRecord> {
    [
        ("30.0", "20.0", "0.0", "No"),
        ("10.0", "5.0", "5.5", "Yes"),
        ("28.0", "18.0", "0.0", "No"),
        ("8.0", "2.0", "12.3", "Yes"),
        ("20.0", "12.0", "0.0", "No"),
    ]
    .into_iter()
    .map(|(max, min, rain, today)| record(&[
        ("MaxTemp", max),
        ("MinTemp", min),
        ("Rainfall", rain),
        ("RainToday", today),
    ]))
    .collect()
}

pub fn record(cells: &[(&str, &str)]) -> WeatherRecord {
    cells.iter().copied().collect()
}
