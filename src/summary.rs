//! Column-by-column summaries of a record set.

use std::{collections::HashSet, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::{self, SerializeMap},
};

use crate::{
    aggregate::{ColumnStats, aggregate},
    record::{AsRecord, ColumnId},
    rows::values_for_column,
};

/// Insertion-ordered mapping from column to its statistics.
///
/// Inserting a column that is already present replaces its statistics but
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSummary {
    entries: Vec<(ColumnId, ColumnStats)>,
}

impl ResultSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: ColumnId, stats: ColumnStats) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == column) {
            Some((_, slot)) => *slot = stats,
            None => self.entries.push((column, stats)),
        }
    }

    pub fn get(&self, column: &ColumnId) -> Option<&ColumnStats> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == column)
            .map(|(_, stats)| stats)
    }

    /// Looks a column up by name.
    pub fn stats(&self, name: &str) -> Option<&ColumnStats> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_name() == Some(name))
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&ColumnId, &ColumnStats)> {
        self.entries.iter().map(|(column, stats)| (column, stats))
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &ColumnId> {
        self.entries.iter().map(|(column, _)| column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns that yielded no numeric value at all.
    pub fn empty_columns(&self) -> impl Iterator<Item = &ColumnId> {
        self.entries
            .iter()
            .filter(|(_, stats)| stats.is_empty())
            .map(|(column, _)| column)
    }

    /// Numeric values summarized across every column.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|(_, stats)| stats.count()).sum()
    }
}

impl FromIterator<(ColumnId, ColumnStats)> for ResultSummary {
    fn from_iter<I: IntoIterator<Item = (ColumnId, ColumnStats)>>(iter: I) -> Self {
        let mut summary = ResultSummary::new();
        for (column, stats) in iter {
            summary.insert(column, stats);
        }
        summary
    }
}

/// Keys are `ColumnId` display strings. Two columns rendering to the same
/// key (a header literally named `#0` next to position 0) fail serialization.
impl Serialize for ResultSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, stats) in &self.entries {
            let key = column.to_string();
            if !seen.insert(key.clone()) {
                return Err(ser::Error::custom(format!("duplicate column key '{key}'")));
            }
            map.serialize_entry(&key, stats)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SummaryVisitor;

        impl<'de> Visitor<'de> for SummaryVisitor {
            type Value = ResultSummary;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to column statistics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut summary = ResultSummary::new();
                while let Some((key, stats)) = access.next_entry::<String, ColumnStats>()? {
                    let column = ColumnId::from_key(&key);
                    if summary.get(&column).is_some() {
                        return Err(de::Error::custom(format!("duplicate column key '{key}'")));
                    }
                    summary.insert(column, stats);
                }
                Ok(summary)
            }
        }

        deserializer.deserialize_map(SummaryVisitor)
    }
}

/// Summarizes one column of `records`.
pub fn summarize_column<R: AsRecord>(records: &[R], column: &ColumnId) -> ColumnStats {
    aggregate(values_for_column(records, column))
}

/// Summarizes each requested column in order. Columns without numeric
/// values get a count-0 entry.
pub fn summarize<R: AsRecord>(records: &[R], columns: &[ColumnId]) -> ResultSummary {
    columns
        .iter()
        .map(|column| (column.clone(), summarize_column(records, column)))
        .collect()
}

/// [`summarize`] for one-shot sources: the records are materialized once so
/// every column can re-scan them.
pub fn summarize_iter<I>(records: I, columns: &[ColumnId]) -> ResultSummary
where
    I: IntoIterator,
    I::Item: AsRecord,
{
    let materialized: Vec<I::Item> = records.into_iter().collect();
    summarize(&materialized, columns)
}
