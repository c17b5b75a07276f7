//! Date display helpers.

use chrono::{Local, NaiveDate};

/// Render a date the way Indian notices print it, e.g. `05 Feb 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
