//! Civil Calendar Arithmetic
//!
//! Converts UTC/local epoch seconds into proleptic-Gregorian calendar
//! fields (year, month, day, hour, minute, second, weekday) without any
//! timezone database: the engine applies its offset and DST adjustment to
//! the epoch *before* decomposition.
//!
//! Everything here is integer math with bounded loops; no allocation.

use core::fmt::Write;

use heapless::String;

use crate::constants::SECONDS_PER_DAY;

/// Day of week, `0 = Sunday .. 6 = Saturday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Weekday {
    /// Sunday (index 0)
    Sunday = 0,
    /// Monday
    Monday = 1,
    /// Tuesday
    Tuesday = 2,
    /// Wednesday
    Wednesday = 3,
    /// Thursday
    Thursday = 4,
    /// Friday
    Friday = 5,
    /// Saturday
    Saturday = 6,
}

impl Weekday {
    /// Weekday from an index; values above 6 wrap modulo 7.
    pub fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    /// Weekday of a day counted from the Unix epoch.
    ///
    /// 1970-01-01 was a Thursday.
    pub fn from_days_since_epoch(days: i64) -> Self {
        Self::from_index((days + 4).rem_euclid(7) as u8)
    }

    /// Numeric index, `0 = Sunday .. 6 = Saturday`.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Three-letter uppercase abbreviation for the display.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "SUN",
            Weekday::Monday => "MON",
            Weekday::Tuesday => "TUE",
            Weekday::Wednesday => "WED",
            Weekday::Thursday => "THU",
            Weekday::Friday => "FRI",
            Weekday::Saturday => "SAT",
        }
    }
}

/// Broken-down civil date and time at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CivilDateTime {
    /// Full year (e.g. 2024)
    pub year: u16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Day of week, consistent with the date fields
    pub weekday: Weekday,
}

impl CivilDateTime {
    /// Decompose epoch seconds into civil fields.
    ///
    /// The input is whatever epoch the caller wants broken down - UTC, or
    /// an already offset-adjusted local instant. Years outside the `u16`
    /// range are not expected from a `u32` source epoch and saturate.
    pub fn from_epoch(epoch_secs: i64) -> Self {
        let days = epoch_secs.div_euclid(SECONDS_PER_DAY);
        let in_day = epoch_secs.rem_euclid(SECONDS_PER_DAY);

        let second = (in_day % 60) as u8;
        let minute = ((in_day / 60) % 60) as u8;
        let hour = (in_day / 3600) as u8;

        let weekday = Weekday::from_days_since_epoch(days);

        // Walk years out from 1970. A u32 source epoch spans 1970-2106,
        // so the loop is short; negative days (pre-epoch local instants
        // near the floor) walk backwards.
        let mut year: i64 = 1970;
        let mut remaining = days;
        if remaining >= 0 {
            loop {
                let days_in_year: i64 = if is_leap_year_i64(year) { 366 } else { 365 };
                if remaining < days_in_year {
                    break;
                }
                remaining -= days_in_year;
                year += 1;
            }
        } else {
            loop {
                year -= 1;
                let days_in_year: i64 = if is_leap_year_i64(year) { 366 } else { 365 };
                remaining += days_in_year;
                if remaining >= 0 {
                    break;
                }
            }
        }

        // Walk months within the year.
        let mut month: u8 = 1;
        let mut day_rem = remaining as u16;
        loop {
            let dim = days_in_month(month, year.clamp(0, u16::MAX as i64) as u16) as u16;
            if day_rem < dim || month == 12 {
                break;
            }
            day_rem -= dim;
            month += 1;
        }

        CivilDateTime {
            year: year.clamp(0, u16::MAX as i64) as u16,
            month,
            day: (day_rem + 1) as u8,
            hour,
            minute,
            second,
            weekday,
        }
    }
}

/// True for Gregorian leap years.
pub fn is_leap_year(year: u16) -> bool {
    is_leap_year_i64(year as i64)
}

fn is_leap_year_i64(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in the given month (1-12) of the given year.
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Three-letter uppercase month abbreviation for the display.
pub fn month_short_name(month: u8) -> &'static str {
    match month {
        1 => "JAN",
        2 => "FEB",
        3 => "MAR",
        4 => "APR",
        5 => "MAY",
        6 => "JUN",
        7 => "JUL",
        8 => "AUG",
        9 => "SEP",
        10 => "OCT",
        11 => "NOV",
        12 => "DEC",
        _ => "???",
    }
}

/// Format hour/minute for the display, 12-hour or 24-hour style.
///
/// 12-hour output is space-padded with an AM/PM suffix (`" 1:05 PM"`);
/// 24-hour output is zero-padded (`"13:05"`).
pub fn format_clock(hour: u8, minute: u8, use_12_hour: bool) -> String<8> {
    let mut out = String::new();
    if use_12_hour {
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let mut h12 = hour % 12;
        if h12 == 0 {
            h12 = 12;
        }
        let _ = write!(out, "{:2}:{:02} {}", h12, minute, suffix);
    } else {
        let _ = write!(out, "{:02}:{:02}", hour, minute);
    }
    out
}
