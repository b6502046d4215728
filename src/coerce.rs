//! Best-effort conversion of raw cells into numbers.
//!
//! Malformed input is data-quality noise, so nothing here fails: every cell
//! is either a number or "no value".

use crate::record::Cell;

const MISSING_TOKENS: &[&str] = &["nan", "na", "null"];

/// Converts a raw text cell into a number.
///
/// Blank input and the tokens `nan`, `na`, `null` (any case) are `None`.
/// Thousands separators are stripped before parsing.
pub fn coerce(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return None;
    }
    if trimmed.contains(',') {
        trimmed.replace(',', "").parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    }
}

/// Coerces a cell that may already be numeric. Numbers pass through
/// untouched, NaN included.
pub fn coerce_cell(cell: Cell<'_>) -> Option<f64> {
    match cell {
        Cell::Text(text) => coerce(Some(text)),
        Cell::Number(value) => Some(value),
    }
}

/// True when a coerced value should be dropped from a column.
pub(crate) fn is_missing(value: Option<f64>) -> bool {
    value.is_none_or(f64::is_nan)
}
