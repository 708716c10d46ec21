// Untyped workbook cells

use chrono::NaiveDateTime;
use serde::Serialize;

/// A single cell as exported by the league workbook.
///
/// Exports mix blanks, numbers, labels and date/time values in the same
/// column, so every normalizer dispatches on the variant rather than probing
/// the raw value. Serializes untagged: `null`, a number, a string, or an ISO
/// timestamp, which is the shape kept in the raw-row payloads.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Temporal(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text of a `Text` cell, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Non-empty text content, used for team-name columns.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.as_text().filter(|s| !s.is_empty())
    }

    /// Render the cell as free text, or `None` for blank/zero cells.
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if *n == 0.0 || n.is_nan() => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Temporal(dt) => Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Integers without decimals, everything else as-is.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Cell at `index`, treating cells past the end of a short row as blank.
pub fn cell_at(row: &[CellValue], index: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(index).unwrap_or(&EMPTY)
}
