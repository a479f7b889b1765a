//! Display formatting for the provider's date and hour strings.
//!
//! Both formatters are total: input that does not parse is returned unchanged.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `"2024-01-15"` → `"Mon, Jan 15"`.
pub fn format_date(date: &str) -> String {
    reformat_date(date, "%a, %b %d")
}

/// `"2024-01-15 15:00"` → `"03PM"`.
pub fn format_hour(timestamp: &str) -> String {
    match NaiveDateTime::parse_from_str(timestamp.trim(), HOUR_FORMAT) {
        Ok(dt) => dt.format("%I%p").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

fn reformat_date(date: &str, pattern: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), DATE_FORMAT) {
        Ok(d) => d.format(pattern).to_string(),
        Err(_) => date.to_string(),
    }
}
