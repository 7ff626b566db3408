//! # Temporal Types: Simulation Month, Dates, Ages
//!
//! Defines [`SimulationMonth`], the calendar month a simulation is evaluated
//! for, and the date helpers built on it.
//!
//! ## Invariants
//!
//! - Period keys are `YYYY-MM` (monthly) or `YYYY` (yearly), always UTC.
//! - Month arithmetic is calendar arithmetic on (year, month) pairs, never
//!   day counts: three months before `2025-01` is `2024-10`.
//! - Birthdates are calendar dates at UTC midnight. Impossible dates such as
//!   `2020-02-31` are rejected instead of rolling over.
//! - An age is the number of whole years between the birthdate and the last
//!   day of the simulation month.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A calendar month (UTC) used as the reference period of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimulationMonth {
    year: i32,
    /// 1-based month.
    month: u32,
}

impl SimulationMonth {
    /// The current UTC month.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Construct from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse a `YYYY-MM` key.
    pub fn parse_key(key: &str) -> Option<Self> {
        let (year, month) = key.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based calendar month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Monthly period key, e.g. `2025-10`.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Yearly period key, e.g. `2025`.
    pub fn year_key(&self) -> String {
        format!("{:04}", self.year)
    }

    /// The month `n` calendar months earlier.
    pub fn minus_months(&self, n: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Last calendar day of this month.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for SimulationMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.month_key())
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a date from a raw JSON leaf.
///
/// Accepted shapes, in order:
/// - `YYYY-MM-DD` (also `/` or `.` separators);
/// - `DD-MM-YYYY` (French order, same separators);
/// - RFC 3339 / RFC 2822 timestamps and `YYYY-MM-DDTHH:MM:SS` variants,
///   truncated to their UTC calendar date;
/// - numbers, read as Unix epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

/// Parse a date string; see [`parse_date`].
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_calendar_date(trimmed) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Strict numeric calendar date: `YYYY-MM-DD` or `DD-MM-YYYY`, with `-`,
/// `/` or `.` as separators. Used where a loose match would be ambiguous
/// (child list items).
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(['-', '/', '.']).collect();
    let &[a, b, c] = parts.as_slice() else {
        return None;
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(a) && all_digits(b) && all_digits(c)) || b.len() != 2 {
        return None;
    }
    let (year, month, day) = match (a.len(), c.len()) {
        (4, 2) => (a, b, c),
        (2, 4) => (c, b, a),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Ages
// ---------------------------------------------------------------------------

/// Age in whole years at the last day of `month`.
///
/// Years since birth, decremented by one when the birthday has not yet
/// occurred by the end of the month. Returns `None` for birthdates after
/// the end of the month.
pub fn age_at_end_of_month(birthdate: NaiveDate, month: SimulationMonth) -> Option<u32> {
    let end = month.last_day();
    let mut age = end.year() - birthdate.year();
    let month_diff = end.month() as i32 - birthdate.month() as i32;
    if month_diff < 0 || (month_diff == 0 && end.day() < birthdate.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// A usable age: finite and non-negative.
pub fn is_valid_age(age: f64) -> bool {
    age.is_finite() && age >= 0.0
}
