//! Utility functions for date windows, recency checks and log formatting.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Length of the "today's news" window.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Calendar-day bounds sent as `from`/`to` on news requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Trailing 24 hours ending at `now`, truncated to UTC calendar days.
    pub fn trailing_day(now: DateTime<Utc>) -> Self {
        Self {
            from: (now - Duration::hours(RECENT_WINDOW_HOURS)).date_naive(),
            to: now.date_naive(),
        }
    }

    /// Lower bound as an ISO-8601 date (`YYYY-MM-DD`) for the `from` parameter.
    pub fn from_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// Upper bound as an ISO-8601 date (`YYYY-MM-DD`) for the `to` parameter.
    pub fn to_param(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

/// True iff `published_at` is strictly after `now - 24h`.
pub fn is_recent_at(published_at: &DateTime<Utc>, now: DateTime<Utc>) -> bool {
    *published_at > now - Duration::hours(RECENT_WINDOW_HOURS)
}

/// Wall-clock version of [`is_recent_at`].
pub fn is_recent_article(published_at: &DateTime<Utc>) -> bool {
    is_recent_at(published_at, Utc::now())
}

/// Format a publish time for display, e.g. `Oct 18, 2026`.
pub fn format_display_date(published_at: &DateTime<Utc>) -> String {
    published_at.format("%b %d, %Y").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) with
/// an ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
