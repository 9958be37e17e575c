use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::network::Timestamp;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const fn const_unwrap<T: Copy>(x: Option<T>) -> T {
    if let Some(x) = x { x } else { panic!("Failed to const unwrap.") }
}

pub fn get_time_str(time: Timestamp) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn parse_time(s: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), TIME_FORMAT)
}

// Split an `hhmm` clock reading (e.g. 1435 for 14:35) into hours and minutes.
pub fn split_hhmm(hhmm: u32) -> Option<(u32, u32)> {
    let (hours, minutes) = (hhmm / 100, hhmm % 100);
    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        None
    } else {
        Some((hours, minutes))
    }
}

// Parse an `hhmm` clock reading. Some exports write them as floats ("517.0"), which is only
// accepted when the fractional part is zero.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if fraction.is_some_and(|fraction| fraction.is_empty() || fraction.bytes().any(|b| b != b'0')) {
        return None;
    }
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

// Combine a calendar date with an `hhmm` clock reading. 2400 is midnight at the end of the day.
pub fn combine_date_hhmm(date: NaiveDate, hhmm: u32) -> Option<Timestamp> {
    let (hours, minutes) = split_hhmm(hhmm)?;
    if hours == 24 {
        return date.and_hms_opt(0, 0, 0)?.checked_add_signed(TimeDelta::days(1));
    }
    Some(date.and_time(NaiveTime::from_hms_opt(hours, minutes, 0)?))
}

pub fn get_duration_str(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes();
    format!("{}h{:02}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
pub(crate) fn at(hours: u32, minutes: u32) -> Timestamp {
    const DATE: NaiveDate = const_unwrap(NaiveDate::from_ymd_opt(2013, 1, 1));
    DATE.and_hms_opt(hours, minutes, 0).unwrap()
}
