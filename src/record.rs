//! Record shapes accepted by the aggregation pipeline.
//!
//! The pipeline never inspects concrete record types directly. Anything that
//! can describe itself through [`AsRecord::view`] can be summarized:
//!
//! - **Mapping** records look up cells by column name ([`WeatherRecord`],
//!   `HashMap<String, String>`).
//! - **Positional** records read cells by index, optionally behind a header
//!   row (`Vec<String>`, `[String]`).
//! - **Scalar** records are a single cell (`String`, `&str`, `f64`).

use std::{collections::HashMap, fmt};

/// A raw cell before coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// The shape a record exposes to the row adapter.
#[derive(Debug, Clone, Copy)]
pub enum RecordView<'a> {
    Mapping(&'a HashMap<String, String>),
    Positional(&'a [String]),
    Scalar(Cell<'a>),
    /// Carries no readable cell at all.
    Opaque,
}

pub trait AsRecord {
    fn view(&self) -> RecordView<'_>;
}

impl<T: AsRecord + ?Sized> AsRecord for &T {
    fn view(&self) -> RecordView<'_> {
        (**self).view()
    }
}

impl AsRecord for HashMap<String, String> {
    fn view(&self) -> RecordView<'_> {
        RecordView::Mapping(self)
    }
}

impl AsRecord for [String] {
    fn view(&self) -> RecordView<'_> {
        RecordView::Positional(self)
    }
}

impl AsRecord for Vec<String> {
    fn view(&self) -> RecordView<'_> {
        RecordView::Positional(self.as_slice())
    }
}

impl AsRecord for String {
    fn view(&self) -> RecordView<'_> {
        RecordView::Scalar(Cell::Text(self.as_str()))
    }
}

impl AsRecord for str {
    fn view(&self) -> RecordView<'_> {
        RecordView::Scalar(Cell::Text(self))
    }
}

impl AsRecord for f64 {
    fn view(&self) -> RecordView<'_> {
        RecordView::Scalar(Cell::Number(*self))
    }
}

impl<T: AsRecord> AsRecord for Option<T> {
    fn view(&self) -> RecordView<'_> {
        match self {
            Some(inner) => inner.view(),
            None => RecordView::Opaque,
        }
    }
}

/// One data row of a weather file, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRecord {
    pub row: HashMap<String, String>,
}

impl WeatherRecord {
    pub fn new(row: HashMap<String, String>) -> Self {
        Self { row }
    }

    /// Returns the raw cell for `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.row.get(column).map(String::as_str).unwrap_or("")
    }
}

impl AsRecord for WeatherRecord {
    fn view(&self) -> RecordView<'_> {
        RecordView::Mapping(&self.row)
    }
}

impl<K, V> FromIterator<(K, V)> for WeatherRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            row: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Owned record for callers whose sources mix shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Mapping(HashMap<String, String>),
    Positional(Vec<String>),
    Scalar(String),
    Number(f64),
}

impl AsRecord for Record {
    fn view(&self) -> RecordView<'_> {
        match self {
            Record::Mapping(map) => RecordView::Mapping(map),
            Record::Positional(cells) => RecordView::Positional(cells),
            Record::Scalar(text) => RecordView::Scalar(Cell::Text(text)),
            Record::Number(value) => RecordView::Scalar(Cell::Number(*value)),
        }
    }
}

/// Selects a field from a record: by name for mappings and headed rows, by
/// position for positional rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Name(String),
    Position(i64),
}

impl ColumnId {
    /// Parses a CLI column token. `#N` selects a position, anything else is a
    /// name.
    pub fn parse(token: &str) -> Self {
        Self::from_key(token.trim())
    }

    /// Inverse of [`Display`](fmt::Display): `#N` is a position, any other
    /// key is taken verbatim as a name.
    pub fn from_key(key: &str) -> Self {
        if let Some(digits) = key.strip_prefix('#')
            && let Ok(position) = digits.parse::<i64>()
        {
            return ColumnId::Position(position);
        }
        ColumnId::Name(key.to_string())
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ColumnId::Name(name) => Some(name),
            ColumnId::Position(_) => None,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Name(name) => f.write_str(name),
            ColumnId::Position(position) => write!(f, "#{position}"),
        }
    }
}

impl From<&str> for ColumnId {
    fn from(name: &str) -> Self {
        ColumnId::Name(name.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(name: String) -> Self {
        ColumnId::Name(name)
    }
}

impl From<i64> for ColumnId {
    fn from(position: i64) -> Self {
        ColumnId::Position(position)
    }
}
