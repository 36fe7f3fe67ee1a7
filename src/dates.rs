//! Relative-date tokens, time/period validation, and the wall-clock
//! UTC round trip used for stored due times.

use std::sync::LazyLock;

use chrono::{Days, Local, Months, NaiveDate};
use regex::Regex;

use crate::error::{Error, Result};

/// A resolved due-date constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConstraint {
    /// A concrete calendar date.
    On(NaiveDate),
    /// Explicitly no due date. Distinct from "unspecified": callers that
    /// omit a date fall back to their own default instead.
    Unset,
}

impl DateConstraint {
    /// The stored `YYYY-MM-DD` form, or `None` for the null marker.
    pub fn to_stored(self) -> Option<String> {
        match self {
            DateConstraint::On(date) => Some(date.format(DATE_FORMAT).to_string()),
            DateConstraint::Unset => None,
        }
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const RELATIVE_EXPECTED: &str = "YYYY-MM-DD, today, tomorrow, '+N days|months|years', or no";

static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d{1,3}) (days|months|years)$").unwrap());
// Month 01-12, day 01-31; finer calendar validation happens when the
// matched text is turned into a real date.
static ABSOLUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[012])-(0[1-9]|[12]\d|3[01])$").unwrap());
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());
static PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3} (days|months|years)|workdays)$").unwrap());

/// Resolve a relative-date token against the current local date.
pub fn resolve(token: &str) -> Result<DateConstraint> {
    resolve_at(token, Local::now().date_naive())
}

/// Resolve a relative-date token against an explicit base date.
///
/// Recognized tokens, first match wins: `+N days|months|years`, `today`,
/// `tomorrow`, `no`, and absolute `YYYY-MM-DD`. Month and year offsets are
/// calendar arithmetic, never day-count approximations.
pub fn resolve_at(token: &str, base: NaiveDate) -> Result<DateConstraint> {
    if let Some(caps) = OFFSET_RE.captures(token) {
        let n: u32 = caps[1].parse().map_err(|_| format_error("date", token))?;
        let date = match &caps[2] {
            "days" => base.checked_add_days(Days::new(u64::from(n))),
            "months" => base.checked_add_months(Months::new(n)),
            _ => base.checked_add_months(Months::new(n * 12)),
        };
        return date
            .map(DateConstraint::On)
            .ok_or_else(|| format_error("date", token));
    }

    match token {
        "today" => Ok(DateConstraint::On(base)),
        "tomorrow" => base
            .checked_add_days(Days::new(1))
            .map(DateConstraint::On)
            .ok_or_else(|| format_error("date", token)),
        "no" => Ok(DateConstraint::Unset),
        _ => {
            if !ABSOLUTE_RE.is_match(token) {
                return Err(format_error("date", token));
            }
            // The pattern admits a few impossible dates (e.g. Feb 31);
            // those fail here rather than reaching the store.
            NaiveDate::parse_from_str(token, DATE_FORMAT)
                .map(DateConstraint::On)
                .map_err(|_| format_error("date", token))
        }
    }
}

fn format_error(what: &'static str, input: &str) -> Error {
    Error::Format {
        what,
        input: input.to_string(),
        expected: match what {
            "time" => "HH:MM",
            "period" => "'N days|months|years' or workdays",
            _ => RELATIVE_EXPECTED,
        },
    }
}

/// Whether a string is a valid `HH:MM` time of day.
pub fn validate_time(time: &str) -> bool {
    TIME_RE.is_match(time)
}

/// Whether a string is a valid recurrence period.
pub fn validate_period(period: &str) -> bool {
    PERIOD_RE.is_match(period)
}

/// `validate_time` as a fallible parse, for clap and wizard fields.
pub fn ensure_time(time: &str) -> Result<String> {
    if validate_time(time) {
        Ok(time.to_string())
    } else {
        Err(format_error("time", time))
    }
}

/// `validate_period` as a fallible parse, for clap and wizard fields.
pub fn ensure_period(period: &str) -> Result<String> {
    if validate_period(period) {
        Ok(period.to_string())
    } else {
        Err(format_error("period", period))
    }
}

/// Strict absolute `YYYY-MM-DD`, for note dates and report filters.
pub fn ensure_date(date: &str) -> Result<NaiveDate> {
    if !ABSOLUTE_RE.is_match(date) {
        return Err(format_error("date", date));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| format_error("date", date))
}

/// Convert a local wall-clock `HH:MM` to its UTC equivalent for storage.
///
/// The shift uses the *current* system offset, not the offset valid on the
/// date the task is due, so times entered across a DST boundary land an
/// hour off. Known approximation for a single-timezone personal tool; the
/// round trip at any one instant is the identity.
pub fn local_time_to_utc(time: &str) -> Result<String> {
    shift_hhmm(time, -current_offset_minutes())
}

/// Convert a stored UTC `HH:MM` back to local wall-clock time.
pub fn utc_time_to_local(time: &str) -> Result<String> {
    shift_hhmm(time, current_offset_minutes())
}

/// The current UTC time as `HH:MM`, for comparing against stored due times.
pub fn now_utc_hhmm() -> String {
    chrono::Utc::now().format("%H:%M").to_string()
}

fn current_offset_minutes() -> i32 {
    Local::now().offset().local_minus_utc() / 60
}

fn shift_hhmm(time: &str, delta_minutes: i32) -> Result<String> {
    ensure_time(time)?;
    let (hours, minutes) = time.split_at(2);
    let hours: i32 = hours.parse().map_err(|_| format_error("time", time))?;
    let minutes: i32 = minutes[1..]
        .parse()
        .map_err(|_| format_error("time", time))?;

    let total = (hours * 60 + minutes + delta_minutes).rem_euclid(24 * 60);
    Ok(format!("{:02}:{:02}", total / 60, total % 60))
}
