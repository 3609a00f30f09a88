//! Business-timezone time normalization.
//!
//! Appointments travel through the system as absolute instants; every
//! wall-clock judgement (business hours, calendar day, blocked windows) is
//! made in the business's fixed local zone, never the host timezone.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::model::{MINUTE_MS, Ms, Span};

/// The spa operates on Lima wall-clock time.
pub const BUSINESS_TZ: Tz = chrono_tz::America::Lima;

/// Local wall-clock view of one appointment interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTiming {
    /// Minute of day of the start, in the business zone.
    pub start_minute: u16,
    /// Minute of day of the end. For a span crossing local midnight this
    /// wraps to an early-morning value; the hours check therefore judges the
    /// end as start + elapsed minutes instead.
    pub end_minute: u16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Derive the local timing of an interval. Pure; inputs must already be
/// inside the timestamp limits.
pub fn local_timing(start: Ms, duration_min: u32) -> LocalTiming {
    let end = start + Ms::from(duration_min) * MINUTE_MS;
    let local_start = to_business(start);
    let local_end = to_business(end);
    LocalTiming {
        start_minute: minute_of_day(&local_start),
        end_minute: minute_of_day(&local_end),
        start_date: local_start.date_naive(),
        end_date: local_end.date_naive(),
    }
}

/// Local calendar date an instant falls on.
pub fn local_date(at: Ms) -> NaiveDate {
    to_business(at).date_naive()
}

/// Absolute-millisecond window covering one local calendar day.
pub fn day_bounds(date: NaiveDate) -> Span {
    Span::new(local_midnight(date), local_midnight(date + Days::new(1)))
}

fn local_midnight(date: NaiveDate) -> Ms {
    BUSINESS_TZ
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .expect("business timezone has no DST transitions")
        .timestamp_millis()
}

fn to_business(at: Ms) -> DateTime<Tz> {
    DateTime::from_timestamp_millis(at)
        .expect("timestamp validated against limits")
        .with_timezone(&BUSINESS_TZ)
}

fn minute_of_day(at: &DateTime<Tz>) -> u16 {
    (at.hour() * 60 + at.minute()) as u16
}
