//! Per-cell coercion for the league workbook.
//!
//! The export encodes durations two different ways depending on the sheet,
//! so there are two duration parsers. They must not be merged: the match
//! parser carries a reinterpretation heuristic that would corrupt possession
//! values.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use ruckstats_core::CellValue;

/// A clock-style string whose parts are not numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedDuration {
    pub value: String,
}

impl fmt::Display for MalformedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed duration '{}'", self.value)
    }
}

/// Numeric cell value, or `default` for blank and non-numeric cells.
pub fn number_or(cell: &CellValue, default: f64) -> f64 {
    match cell {
        CellValue::Number(n) if !n.is_nan() => *n,
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return default;
            }
            match trimmed.parse::<f64>() {
                Ok(n) if !n.is_nan() => n,
                _ => default,
            }
        }
        _ => default,
    }
}

/// Rate cells are already fractions in [0, 1]; no scaling is applied.
pub fn fraction_or(cell: &CellValue, default: f64) -> f64 {
    number_or(cell, default)
}

/// Match-level elapsed time in seconds.
///
/// Temporal cells from the matches sheet sometimes carry `mm:ss` written as
/// `hh:mm` (27:41 becomes 27 hours 41 minutes). Anything above two hours is
/// read back as minutes and seconds.
pub fn match_duration_secs(cell: &CellValue) -> Result<f64, MalformedDuration> {
    match cell {
        CellValue::Empty => Ok(0.0),
        CellValue::Temporal(dt) => Ok(temporal_match_secs(dt) as f64),
        CellValue::Text(s) => clock_text_secs(s),
        CellValue::Number(n) if *n < 1.0 => Ok(day_fraction_secs(*n)),
        CellValue::Number(n) => Ok(n.floor()),
    }
}

/// Possession time in seconds. The hour field holds minutes and the minute
/// field holds seconds.
pub fn possession_secs(cell: &CellValue) -> Result<f64, MalformedDuration> {
    match cell {
        CellValue::Temporal(dt) => Ok((dt.hour() * 60 + dt.minute()) as f64),
        CellValue::Text(s) => clock_text_secs(s),
        CellValue::Number(n) if *n < 1.0 => Ok(day_fraction_secs(*n)),
        _ => Ok(0.0),
    }
}

fn temporal_match_secs(dt: &NaiveDateTime) -> i64 {
    let hours = epoch_day_offset(dt.date()) * 24 + i64::from(dt.hour());
    let minutes = i64::from(dt.minute());
    if hours > 2 {
        hours * 60 + minutes
    } else {
        hours * 3600 + minutes * 60 + i64::from(dt.second())
    }
}

/// Whole days past 1899-12-30 for values that spilled over midnight.
/// Only dates next to the epoch (Dec 1899, Jan 1900) are durations.
fn epoch_day_offset(date: NaiveDate) -> i64 {
    match (date.year(), date.month()) {
        (1899, 12) => i64::from(date.day()) - 30,
        (1900, 1) => 1 + i64::from(date.day()),
        _ => 0,
    }
}

/// `h:mm:ss` drops the hours; `mm:ss` is taken as-is. Other shapes are 0.
fn clock_text_secs(s: &str) -> Result<f64, MalformedDuration> {
    let parts: Vec<&str> = s.split(':').collect();
    let (minutes, seconds) = match parts.as_slice() {
        [_, mm, ss] | [mm, ss] => (*mm, *ss),
        _ => return Ok(0.0),
    };
    let part = |p: &str| -> Result<f64, MalformedDuration> {
        let p = p.trim();
        if p.is_empty() {
            return Ok(0.0);
        }
        p.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| MalformedDuration { value: s.to_string() })
    };
    Ok(part(minutes)? * 60.0 + part(seconds)?)
}

/// Day fraction to whole seconds, truncated.
fn day_fraction_secs(fraction: f64) -> f64 {
    // Millisecond rounding absorbs float noise such as 1685.9999...
    let millis = (fraction * 86_400_000.0).round();
    (millis / 1000.0).floor()
}
