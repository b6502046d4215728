//! Column extraction over records of unknown shape.
//!
//! [`values_for_column()`] inspects the first record once, resolves a
//! [`RowAccessor`] and applies it to every row after that. The first record
//! is emitted as data except when a positional stream is read by column
//! name and the name appears in the first row; that row is then a header.

use std::iter::FusedIterator;

use crate::{
    coerce::{coerce, coerce_cell, is_missing},
    record::{AsRecord, Cell, ColumnId, RecordView},
};

/// How cells are pulled out of every row of one column scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAccessor {
    /// Look the column up by key; absent keys read as `""`.
    Mapping(String),
    /// Mapping rows selected by position: no key can ever match.
    Unkeyed,
    /// Read the cell at a fixed index.
    Positional(usize),
    /// The record itself is the cell.
    Scalar,
}

/// The accessor chosen for a stream plus whether its first record is data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShape {
    pub accessor: RowAccessor,
    pub first_is_data: bool,
}

impl RowAccessor {
    /// Resolves the accessor for `column` from the first record only.
    pub fn resolve(first: RecordView<'_>, column: &ColumnId) -> ResolvedShape {
        match first {
            RecordView::Mapping(_) => ResolvedShape {
                accessor: match column {
                    ColumnId::Name(name) => RowAccessor::Mapping(name.clone()),
                    ColumnId::Position(_) => RowAccessor::Unkeyed,
                },
                first_is_data: true,
            },
            RecordView::Positional(cells) => match column {
                ColumnId::Position(position) => ResolvedShape {
                    accessor: RowAccessor::Positional(clamp_position(*position)),
                    first_is_data: true,
                },
                ColumnId::Name(name) => match cells.iter().position(|cell| cell == name) {
                    Some(index) => ResolvedShape {
                        accessor: RowAccessor::Positional(index),
                        first_is_data: false,
                    },
                    None => ResolvedShape {
                        accessor: RowAccessor::Positional(0),
                        first_is_data: true,
                    },
                },
            },
            RecordView::Scalar(_) | RecordView::Opaque => ResolvedShape {
                accessor: RowAccessor::Scalar,
                first_is_data: true,
            },
        }
    }

    /// Extracts and coerces this accessor's cell from one row.
    pub fn read(&self, row: RecordView<'_>) -> Option<f64> {
        match (self, row) {
            (RowAccessor::Mapping(key), RecordView::Mapping(map)) => {
                coerce(Some(map.get(key).map(String::as_str).unwrap_or("")))
            }
            (RowAccessor::Positional(index), RecordView::Positional(cells)) => {
                coerce(Some(cells.get(*index).map(String::as_str).unwrap_or("")))
            }
            // A scalar among positional rows stands for itself.
            (RowAccessor::Positional(_), RecordView::Scalar(cell)) => coerce_cell(cell),
            (RowAccessor::Scalar, RecordView::Scalar(cell)) => coerce_cell(cell),
            _ => None,
        }
    }
}

fn clamp_position(position: i64) -> usize {
    usize::try_from(position.max(0)).unwrap_or(usize::MAX)
}

/// Lazy, single-pass sequence of the numeric values of one column.
pub struct ColumnValues<I: Iterator> {
    records: I,
    accessor: RowAccessor,
    pending: Option<I::Item>,
}

impl<I> ColumnValues<I>
where
    I: Iterator,
    I::Item: AsRecord,
{
    pub fn new<S>(records: S, column: &ColumnId) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        let mut records = records.into_iter();
        let Some(first) = records.next() else {
            return Self {
                records,
                accessor: RowAccessor::Scalar,
                pending: None,
            };
        };
        let shape = RowAccessor::resolve(first.view(), column);
        Self {
            records,
            accessor: shape.accessor,
            pending: shape.first_is_data.then_some(first),
        }
    }

    pub fn accessor(&self) -> &RowAccessor {
        &self.accessor
    }
}

impl<I> Iterator for ColumnValues<I>
where
    I: Iterator,
    I::Item: AsRecord,
{
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let record = match self.pending.take() {
                Some(first) => first,
                None => self.records.next()?,
            };
            let value = self.accessor.read(record.view());
            if is_missing(value) {
                continue;
            }
            return value;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.records.size_hint();
        let pending = usize::from(self.pending.is_some());
        (0, upper.and_then(|upper| upper.checked_add(pending)))
    }
}

impl<I> FusedIterator for ColumnValues<I>
where
    I: FusedIterator,
    I::Item: AsRecord,
{
}

/// Numeric values of `column` across `records`, skipping cells that do not
/// coerce to a number.
pub fn values_for_column<S>(records: S, column: &ColumnId) -> ColumnValues<S::IntoIter>
where
    S: IntoIterator,
    S::Item: AsRecord,
{
    ColumnValues::new(records, column)
}

/// Coerces a single text cell the way a column scan would. NaN and
/// unparseable cells are `None`.
pub fn cell_value(cell: &str) -> Option<f64> {
    let value = coerce_cell(Cell::Text(cell));
    (!is_missing(value)).then_some(value).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolve_prefers_header_for_named_positional_column() {
        let header = vec!["Date".to_string(), "MaxTemp".to_string()];
        let shape = RowAccessor::resolve(
            RecordView::Positional(&header),
            &ColumnId::from("MaxTemp"),
        );
        assert_eq!(shape.accessor, RowAccessor::Positional(1));
        assert!(!shape.first_is_data);
    }

    #[test]
    fn resolve_clamps_negative_positions() {
        let row = vec!["1".to_string()];
        let shape = RowAccessor::resolve(RecordView::Positional(&row), &ColumnId::Position(-3));
        assert_eq!(shape.accessor, RowAccessor::Positional(0));
        assert!(shape.first_is_data);
    }

    #[test]
    fn mapping_accessor_ignores_non_mapping_rows() {
        let accessor = RowAccessor::Mapping("A".to_string());
        let cells = vec!["5".to_string()];
        assert_eq!(accessor.read(RecordView::Positional(&cells)), None);
        let map: HashMap<String, String> = [("A".to_string(), "5".to_string())].into();
        assert_eq!(accessor.read(RecordView::Mapping(&map)), Some(5.0));
    }

    #[test]
    fn cell_value_drops_nan() {
        assert_eq!(cell_value("NaN"), None);
        assert_eq!(cell_value("2.5"), Some(2.5));
    }
}
