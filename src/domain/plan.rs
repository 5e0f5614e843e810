//! Plan durations and membership date arithmetic.
//!
//! Every date in the system is a naive local calendar date stored as an ISO
//! `YYYY-MM-DD` string. Nothing in here touches the database.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use thiserror::Error;

use super::member::MemberStatus;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Plan types offered to members, with their duration in months.
pub const PLAN_MONTHS: [(&str, u32); 4] = [
    ("1 month", 1),
    ("3 months", 3),
    ("6 months", 6),
    ("12 months", 12),
];

/// Fallback duration for plan types that are not in [`PLAN_MONTHS`].
pub const DEFAULT_PLAN_MONTHS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("not an ISO date (YYYY-MM-DD)")]
    Invalid,
    #[error("date out of range")]
    OutOfRange,
}

pub fn plan_types() -> impl Iterator<Item = &'static str> {
    PLAN_MONTHS.iter().map(|(name, _)| *name)
}

pub fn is_known_plan(plan_type: &str) -> bool {
    PLAN_MONTHS.iter().any(|(name, _)| *name == plan_type)
}

/// Number of months covered by a plan type. Unknown plan types count as one
/// month rather than failing.
pub fn plan_months(plan_type: &str) -> u32 {
    PLAN_MONTHS
        .iter()
        .find(|(name, _)| *name == plan_type)
        .map(|(_, months)| *months)
        .unwrap_or(DEFAULT_PLAN_MONTHS)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Strict `YYYY-MM-DD`: four-digit unsigned year, two-digit month and day.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateError> {
    let value = value.trim();
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DateError::Invalid);
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| DateError::Invalid)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Calendar month addition. The day of month is clamped to the last day of
/// the target month, so Jan 31 + 1 month is Feb 28 (or Feb 29 in leap years).
/// `None` past the last representable date.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

pub fn end_date_for(start: NaiveDate, plan_type: &str) -> Option<NaiveDate> {
    add_months(start, plan_months(plan_type))
}

/// String form of [`end_date_for`], taking and returning ISO dates. An end
/// date that no longer fits in four digits is out of range.
pub fn calc_end_date(start_date: &str, plan_type: &str) -> Result<String, DateError> {
    let start = parse_iso_date(start_date)?;
    let end = end_date_for(start, plan_type)
        .filter(|end| end.year() <= 9999)
        .ok_or(DateError::OutOfRange)?;
    Ok(format_iso_date(end))
}

/// A membership stays active through its end date.
pub fn infer_status_on(end_date: NaiveDate, today: NaiveDate) -> MemberStatus {
    if end_date >= today {
        MemberStatus::Active
    } else {
        MemberStatus::Expired
    }
}

pub fn infer_status(end_date: NaiveDate) -> MemberStatus {
    infer_status_on(end_date, today())
}

/// Default start of a renewal: the day after the current end date while the
/// membership is still running, otherwise today. `None` when the current end
/// date is the last representable day.
pub fn renewal_start_date(current_end: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    if current_end >= today {
        current_end.checked_add_days(Days::new(1))
    } else {
        Some(today)
    }
}

/// Inclusive `[today, today + days]` window for "expiring soon" lists.
pub fn expiring_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    let until = today
        .checked_add_signed(chrono::Duration::days(days.max(0)))
        .unwrap_or(NaiveDate::MAX);
    (today, until)
}

/// First day of `today`'s month and first day of the following month.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    (first, add_months(first, 1).unwrap_or(NaiveDate::MAX))
}
