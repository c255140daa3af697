//! ISO calendar date keys.
//!
//! Completion history is keyed by `YYYY-MM-DD` strings so that stored
//! documents stay readable and sort lexicographically in date order.

use chrono::{Days, Local, NaiveDate};

use crate::error::ValidationError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(key.to_string()))
}

/// Format a date as a `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// The local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The day before `date`. Saturates at the minimum representable date.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}
