//! MS-DOS packed date/time.
//!
//! ZIP stores modification times as a 32-bit word: the high 16 bits hold the
//! date and the low 16 bits hold the time, both in local time with no zone.
//!
//! ```text
//! bits 25-31  year - 1980
//! bits 21-24  month (1-12)
//! bits 16-20  day (1-31)
//! bits 11-15  hour
//! bits  5-10  minute
//! bits  0-4   second / 2
//! ```

use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::time::SystemTime;

/// First year representable in DOS format.
pub const DOS_EPOCH_YEAR: i32 = 1980;

/// Last year representable in DOS format.
pub const DOS_MAX_YEAR: i32 = DOS_EPOCH_YEAR + 0x7f;

/// Pack a calendar time into a DOS date/time word.
///
/// Times before 1980 pack to `0`. Years past 2107 are clamped. Seconds are
/// truncated to the 2-second resolution.
pub fn to_dos_time(dt: &NaiveDateTime) -> u32 {
    if dt.year() < DOS_EPOCH_YEAR {
        return 0;
    }
    let year = (dt.year().min(DOS_MAX_YEAR) - DOS_EPOCH_YEAR) as u32;
    let date = (year << 9) | (dt.month() << 5) | dt.day();
    let time = (dt.hour() << 11) | (dt.minute() << 5) | (dt.second() >> 1);
    (date << 16) | time
}

/// Unpack a DOS date/time word.
///
/// A zero month or day is read as 1. Out-of-range fields roll over into the
/// next unit, so day 31 of February lands in March.
pub fn from_dos_time(value: u32) -> NaiveDateTime {
    unpack(value).unwrap_or_default()
}

fn unpack(value: u32) -> Option<NaiveDateTime> {
    let year = ((value >> 25) & 0x7f) as i32 + DOS_EPOCH_YEAR;
    let month = ((value >> 21) & 0x0f).max(1);
    let day = ((value >> 16) & 0x1f).max(1);
    let hour = (value >> 11) & 0x1f;
    let minute = (value >> 5) & 0x3f;
    let second = (value & 0x1f) << 1;

    let date = NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_months(Months::new(month - 1))?
        .checked_add_days(chrono::Days::new(u64::from(day - 1)))?;
    let offset = TimeDelta::try_seconds(i64::from(hour * 3600 + minute * 60 + second))?;
    date.and_hms_opt(0, 0, 0)?.checked_add_signed(offset)
}

/// Split a packed word into its `(time, date)` halves.
pub fn split_dos_time(value: u32) -> (u16, u16) {
    ((value & 0xFFFF) as u16, (value >> 16) as u16)
}

/// Join `(time, date)` halves into a packed word.
pub fn join_dos_time(time: u16, date: u16) -> u32 {
    (u32::from(date) << 16) | u32::from(time)
}

/// Pack a filesystem timestamp, interpreted in the local zone.
pub fn dos_time_from_system(time: SystemTime) -> u32 {
    let local: chrono::DateTime<Local> = time.into();
    to_dos_time(&local.naive_local())
}

/// Pack the current local time.
pub fn dos_time_now() -> u32 {
    to_dos_time(&Local::now().naive_local())
}

/// Convert a DOS word back to a filesystem timestamp in the local zone.
///
/// Returns `None` when the local time is ambiguous or does not exist.
pub fn system_time_from_dos(value: u32) -> Option<SystemTime> {
    from_dos_time(value)
        .and_local_timezone(Local)
        .earliest()
        .map(SystemTime::from)
}
