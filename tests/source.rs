mod common;

use std::fs;

use weather_summary::{
    io_utils::resolve_encoding,
    source::{SourceError, SourceOptions, read_records, read_records_async},
};

use common::TestWorkspace;

const SPACED_HEADERS: &str = "\
Location, MinTemp, MaxTemp, RainFall
Sydney, 15.2, 25.3, 0.0
Melbourne, 12.5, 22.1, 5.2
Brisbane, 18.0, 28.5, 0.0
";

#[tokio::test]
async fn async_read_matches_sync_read() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("weather.csv", SPACED_HEADERS);
    let options = SourceOptions::default();

    let sync = read_records(&path, &options).expect("sync read");
    let async_read = read_records_async(&path, &options).await.expect("async read");

    assert_eq!(sync, async_read);
    assert_eq!(sync.len(), 3);
    assert_eq!(sync.headers, vec!["Location", "MinTemp", "MaxTemp", "RainFall"]);
    let locations: Vec<&str> = sync.records.iter().map(|r| r.get("Location")).collect();
    assert_eq!(locations, vec!["Sydney", "Melbourne", "Brisbane"]);
    assert_eq!(sync.records[1].get("RainFall"), "5.2");
}

#[test]
fn blank_rows_are_skipped() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("gaps.csv", "A,B\n1,2\n , \n3,4\n");
    let dataset = read_records(&path, &SourceOptions::default()).expect("read");
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records[1].get("A"), "3");
}

#[test]
fn header_only_file_has_no_records() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("empty.csv", "MinTemp,MaxTemp\n");
    let dataset = read_records(&path, &SourceOptions::default()).expect("read");
    assert!(dataset.is_empty());
    assert_eq!(dataset.headers.len(), 2);
}

#[test]
fn missing_file_is_not_found() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.csv");
    let err = read_records(&path, &SourceOptions::default()).expect_err("missing");
    assert!(matches!(err, SourceError::NotFound(ref missing) if missing == &path));
}

#[tokio::test]
async fn missing_file_is_not_found_async() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.csv");
    let err = read_records_async(&path, &SourceOptions::default())
        .await
        .expect_err("missing");
    assert!(matches!(err, SourceError::NotFound(_)));
}

#[test]
fn empty_file_has_no_header() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("blank.csv", "");
    let err = read_records(&path, &SourceOptions::default()).expect_err("no header");
    assert!(matches!(err, SourceError::MissingHeader(_)));
}

#[test]
fn tsv_extension_switches_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("weather.tsv", "MinTemp\tMaxTemp\n1.5\t20\n");
    let dataset = read_records(&path, &SourceOptions::default()).expect("read");
    assert_eq!(dataset.records[0].get("MaxTemp"), "20");
}

#[test]
fn explicit_delimiter_overrides_extension() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("weather.csv", "MinTemp;MaxTemp\n1,5;20\n");
    let options = SourceOptions {
        delimiter: Some(b';'),
        ..SourceOptions::default()
    };
    let dataset = read_records(&path, &options).expect("read");
    assert_eq!(dataset.records[0].get("MinTemp"), "1,5");
}

#[test]
fn legacy_encoding_is_decoded() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("latin.csv");
    let mut bytes = b"Station,MaxTemp\nMontr".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"al,21\n");
    fs::write(&path, bytes).expect("write latin file");

    let options = SourceOptions {
        encoding: resolve_encoding(Some("windows-1252")).expect("encoding"),
        ..SourceOptions::default()
    };
    let dataset = read_records(&path, &options).expect("read");
    assert_eq!(dataset.records[0].get("Station"), "Montréal");

    let err = read_records(&path, &SourceOptions::default()).expect_err("invalid utf-8");
    assert!(matches!(err, SourceError::Decode { line: 2, .. }));
}

#[test]
fn unknown_encoding_label_is_rejected() {
    assert!(matches!(
        resolve_encoding(Some("klingon")),
        Err(SourceError::UnknownEncoding(_))
    ));
}
