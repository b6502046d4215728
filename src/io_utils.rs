//! CSV reading helpers: delimiter and encoding resolution, reader
//! construction and field decoding via `encoding_rs`.

use std::{io::Read, path::Path};

use encoding_rs::{Encoding, UTF_8};

use crate::source::SourceError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, SourceError> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| SourceError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Rows may be shorter or longer than the header; missing cells read as
/// blank downstream.
pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Decodes one field. Byte order marks are not sniffed per field.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    (!had_errors).then(|| text.into_owned())
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
    line: u64,
) -> Result<Vec<String>, SourceError> {
    record
        .iter()
        .map(|field| {
            decode_bytes(field, encoding).ok_or(SourceError::Decode {
                line,
                encoding: encoding.name(),
            })
        })
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>, SourceError>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    let mut decoded = decode_record(&headers, encoding, 1)?;
    if let Some(first) = decoded.first_mut()
        && let Some(stripped) = first.strip_prefix('\u{feff}')
    {
        *first = stripped.to_string();
    }
    Ok(decoded)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn resolve_input_delimiter_uses_extension() {
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(&PathBuf::from("a.tsv"), Some(b';')), b';');
    }

    #[test]
    fn resolve_encoding_rejects_unknown_labels() {
        assert_eq!(resolve_encoding(None).expect("default"), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" windows-1252 ")).expect("label").name(),
            "windows-1252"
        );
        assert!(matches!(
            resolve_encoding(Some("klingon")),
            Err(SourceError::UnknownEncoding(label)) if label == "klingon"
        ));
    }

    #[test]
    fn reader_headers_strip_byte_order_mark() {
        let data = "\u{feff}MinTemp,MaxTemp\n1,2\n";
        let mut reader = open_csv_reader(data.as_bytes(), b',', true);
        let headers = reader_headers(&mut reader, UTF_8).expect("headers");
        assert_eq!(headers, vec!["MinTemp", "MaxTemp"]);
    }

    #[test]
    fn decode_record_reports_line() {
        let record = csv::ByteRecord::from(vec![&b"ok"[..], &[0xff, 0xfe][..]]);
        let err = decode_record(&record, UTF_8, 7).unwrap_err();
        assert!(matches!(err, SourceError::Decode { line: 7, .. }));
    }
}
