//! Date and display helpers for tickets.
//!
//! Dates are calendar dates (`NaiveDate`). A missing input yields `None`
//! rather than a sentinel, and display formatting renders `None` as `-`.

use crate::ticket::{Priority, TicketStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Placeholder shown for absent dates
pub const EMPTY_CELL: &str = "-";

/// Ceiling of elapsed days between two dates, `None` if either is missing
pub fn days_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    let (start, end) = (start?, end?);
    // Calendar dates have no time component, so the day difference is
    // already whole and its ceiling is itself.
    Some((end - start).num_days())
}

/// Floor of elapsed days from `created` to now
pub fn days_since_creation(created: Option<NaiveDate>) -> Option<i64> {
    days_since_creation_at(created, Utc::now())
}

/// Floor of elapsed days from `created` (midnight UTC) to `now`
pub fn days_since_creation_at(created: Option<NaiveDate>, now: DateTime<Utc>) -> Option<i64> {
    let created = created?;
    let start = Utc.from_utc_datetime(&created.and_time(NaiveTime::MIN));
    let elapsed = (now - start).num_seconds();
    Some(elapsed.div_euclid(SECONDS_PER_DAY))
}

/// `Jun 15, 2025`, or `-` when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => EMPTY_CELL.to_string(),
    }
}

/// `Jun 15, 2025, 09:30 AM`, or `-` when absent
pub fn format_date_time(date_time: Option<NaiveDateTime>) -> String {
    match date_time {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => EMPTY_CELL.to_string(),
    }
}

/// Display tone for status and priority badges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Orange,
    Yellow,
    Green,
    Gray,
}

pub fn status_tone(status: TicketStatus) -> Tone {
    match status {
        TicketStatus::Open => Tone::Red,
        TicketStatus::InProgress => Tone::Yellow,
        TicketStatus::Resolved => Tone::Green,
        TicketStatus::Closed => Tone::Gray,
    }
}

pub fn priority_tone(priority: Priority) -> Tone {
    match priority {
        Priority::Low => Tone::Green,
        Priority::Medium => Tone::Yellow,
        Priority::High => Tone::Orange,
        Priority::Critical => Tone::Red,
    }
}
