// League workbook import (xlsx, xls, xlsb, ods)
//
// Read-only. Each sheet is materialized as rows of CellValue positioned
// relative to its used range, so column 0 is the first used column.
// Date/time cells become NaiveDateTime against the 1900 date system
// (1899-12-30 epoch).

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ruckstats_core::CellValue;

#[derive(Debug)]
pub enum WorkbookError {
    /// The file could not be opened or is not a spreadsheet.
    Open { path: PathBuf, message: String },
    /// A required sheet is absent.
    MissingSheet { name: String, available: Vec<String> },
    /// The sheet exists but could not be decoded.
    Sheet { name: String, message: String },
}

impl fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => {
                write!(f, "failed to open workbook '{}': {message}", path.display())
            }
            Self::MissingSheet { name, available } => {
                write!(f, "sheet '{name}' not found (available: {})", available.join(", "))
            }
            Self::Sheet { name, message } => write!(f, "failed to read sheet '{name}': {message}"),
        }
    }
}

impl std::error::Error for WorkbookError {}

/// Data rows of one sheet, below its header row.
#[derive(Debug, Clone, Default)]
pub struct SheetRows {
    pub name: String,
    /// Zero-based sheet row where the used range begins.
    pub first_row: usize,
    /// Zero-based index of the header row within the used range.
    pub header_index: usize,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetRows {
    /// Split a full sheet grid at the first row whose column 0 equals
    /// `header_sentinel`. Without a match the header is row 0.
    pub fn from_grid(name: &str, mut grid: Vec<Vec<CellValue>>, header_sentinel: &str) -> Self {
        let header_index = locate_header(&grid, header_sentinel);
        let rows = if grid.len() > header_index {
            grid.split_off(header_index + 1)
        } else {
            Vec::new()
        };
        Self { name: name.to_string(), first_row: 0, header_index, rows }
    }

    /// 1-based row number in the spreadsheet UI for data row `index`.
    pub fn sheet_row_number(&self, index: usize) -> usize {
        self.first_row + self.header_index + index + 2
    }
}

/// Index of the first row whose first cell is the text `sentinel`, else 0.
pub fn locate_header(grid: &[Vec<CellValue>], sentinel: &str) -> usize {
    grid.iter()
        .position(|row| row.first().and_then(CellValue::as_text) == Some(sentinel))
        .unwrap_or(0)
}

/// An open workbook. Dropping it releases the file handle.
pub struct WorkbookSource {
    sheets: Sheets<BufReader<File>>,
}

/// Open a workbook for reading.
pub fn open(path: &Path) -> Result<WorkbookSource, WorkbookError> {
    let sheets = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(WorkbookSource { sheets })
}

impl WorkbookSource {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// Read sheet `name` and split it at its header row.
    pub fn read_sheet(&mut self, name: &str, header_sentinel: &str) -> Result<SheetRows, WorkbookError> {
        let available = self.sheet_names();
        if !available.iter().any(|n| n == name) {
            return Err(WorkbookError::MissingSheet { name: name.to_string(), available });
        }

        let range = self.sheets.worksheet_range(name).map_err(|e| WorkbookError::Sheet {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        // Rows and columns count from the top-left of the used range
        let (first_row, _) = range.start().unwrap_or((0, 0));
        let grid: Vec<Vec<CellValue>> =
            range.rows().map(|row| row.iter().map(cell_from_data).collect()).collect();

        let mut sheet = SheetRows::from_grid(name, grid, header_sentinel);
        sheet.first_row = first_row as usize;
        log::debug!(
            "Sheet '{}': header at row {}, {} data rows",
            name,
            sheet.first_row + sheet.header_index + 1,
            sheet.rows.len()
        );
        Ok(sheet)
    }
}

/// Convert a calamine cell to a CellValue.
pub fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        // Assumes the 1900 date system, like the rest of the importer.
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(CellValue::Temporal)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_temporal(s)
            .map(CellValue::Temporal)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        // ISO duration string - keep as text
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Cell error {:?} read as empty", e);
            CellValue::Empty
        }
    }
}

fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Excel serial (days since 1899-12-30, fraction = time of day) to a
/// timestamp, rounded to the nearest second.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let secs = (serial * 86_400.0).round();
    if secs.abs() > i64::MAX as f64 / 1000.0 {
        return None;
    }
    excel_epoch().checked_add_signed(Duration::seconds(secs as i64))
}

fn parse_iso_temporal(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    // Time-only values hang off the epoch day
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .ok()
        .map(|t| excel_epoch().date().and_time(t))
}
