//! Common types used across the stock ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted from request parameters, tried in order
const INPUT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Date format used in row labels and sheet titles
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a request date, returning `None` when missing or unparsable
pub fn parse_optional_date(input: Option<&str>) -> Option<NaiveDate> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }
    // Accept full timestamps by looking at the date part only
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse an as-on/reference date, falling back to `today`
pub fn parse_report_date(input: Option<&str>, today: NaiveDate) -> NaiveDate {
    parse_optional_date(input).unwrap_or(today)
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Reporting period; a missing bound is unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Strictly before the window
    pub fn is_opening(&self, date: NaiveDate) -> bool {
        self.from.map_or(false, |from| date < from)
    }

    /// Inside the window, bounds inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_production(&self, date: NaiveDate) -> bool {
        self.contains(date)
    }
}
