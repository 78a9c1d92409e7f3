//! Display formatting and explicit parse-validation of free-text input.
//!
//! Numeric fields reject malformed text with a [`ParseFieldError`] instead
//! of silently coercing to zero.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::segments::Totals;

/// Unit used when rendering distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Miles => 1609.344,
        }
    }
}

/// Why a free-text numeric field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFieldError {
    Empty,
    NotANumber,
    NotPositive,
}

impl std::fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFieldError::Empty => write!(f, "Enter a value"),
            ParseFieldError::NotANumber => write!(f, "Enter a number"),
            ParseFieldError::NotPositive => write!(f, "Enter a value greater than zero"),
        }
    }
}

impl std::error::Error for ParseFieldError {}

/// Parse a whole-number field (minutes, seconds, bpm, repeat count).
pub fn parse_whole(text: &str) -> Result<u32, ParseFieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseFieldError::Empty);
    }
    trimmed.parse().map_err(|_| ParseFieldError::NotANumber)
}

/// Parse a repeat count; must be at least one.
pub fn parse_count(text: &str) -> Result<u32, ParseFieldError> {
    match parse_whole(text)? {
        0 => Err(ParseFieldError::NotPositive),
        n => Ok(n),
    }
}

/// Parse a distance entered in the display unit into whole meters.
pub fn parse_distance(text: &str, unit: DistanceUnit) -> Result<u32, ParseFieldError> {
    let trimmed = text.trim().replace(',', ".");
    if trimmed.is_empty() {
        return Err(ParseFieldError::Empty);
    }
    let value: f64 = trimmed.parse().map_err(|_| ParseFieldError::NotANumber)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ParseFieldError::NotPositive);
    }
    Ok((value * unit.meters_per_unit()).round() as u32)
}

static PACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:[0-5]\d$").unwrap());

/// Whether a pace bound is a well-formed `mm:ss` string.
pub fn is_valid_pace(text: &str) -> bool {
    PACE_RE.is_match(text.trim())
}

/// Split seconds into whole minutes and leftover seconds for the editor
/// fields.
pub fn split_minutes_seconds(total_seconds: u32) -> (u32, u32) {
    (total_seconds / 60, total_seconds % 60)
}

/// Compact duration for cards and calendar markers: `30s`, `45min`,
/// `12:30`, `1h30`.
pub fn format_duration(total_seconds: u32) -> String {
    if total_seconds == 0 {
        return "0s".to_owned();
    }
    if total_seconds < 60 {
        return format!("{total_seconds}s");
    }
    let (mins, secs) = split_minutes_seconds(total_seconds);
    if total_seconds >= 3600 {
        let hours = mins / 60;
        let rem_mins = mins % 60;
        return if rem_mins == 0 && secs == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h{rem_mins:02}")
        };
    }
    if secs == 0 {
        format!("{mins}min")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Distance in the display unit with one decimal, e.g. `5.0 km`.
pub fn format_distance(meters: u32, unit: DistanceUnit) -> String {
    let value = meters as f64 / unit.meters_per_unit();
    format!("{:.1} {}", value, unit.label())
}

/// One-line summary of aggregated effort, omitting empty components.
pub fn format_totals(totals: Totals, unit: DistanceUnit) -> String {
    match (totals.distance_m > 0, totals.duration_s > 0) {
        (true, true) => format!(
            "{} \u{2022} {}",
            format_distance(totals.distance_m, unit),
            format_duration(totals.duration_s)
        ),
        (true, false) => format_distance(totals.distance_m, unit),
        (false, true) => format_duration(totals.duration_s),
        (false, false) => "\u{2013}".to_owned(),
    }
}

/// Dates are stored as `YYYY-MM-DD` and shown as `DD/MM/YYYY`.
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
