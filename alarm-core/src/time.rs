//! Minute-resolution wall-clock arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use crate::error::AlarmError;

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// A time of day with minute resolution, `00:00` through `23:59`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < MINUTES_PER_HOUR {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    fn minute_of_day(&self) -> u32 {
        self.hour() * MINUTES_PER_HOUR + self.minute()
    }

    fn from_minute_of_day(total: u32) -> Self {
        let total = total % MINUTES_PER_DAY;
        Self {
            hour: (total / MINUTES_PER_HOUR) as u8,
            minute: (total % MINUTES_PER_HOUR) as u8,
        }
    }
}

impl Default for WallTime {
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parses `H:MM` or `HH:MM`. The minute field is always two digits.
impl FromStr for WallTime {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlarmError::InvalidTimeFormat {
            input: s.to_string(),
        };

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
            return Err(invalid());
        }

        let hour = hours.parse::<u32>().map_err(|_| invalid())?;
        let minute = minutes.parse::<u32>().map_err(|_| invalid())?;
        WallTime::new(hour, minute).ok_or_else(invalid)
    }
}

/// Adds `delta` minutes, carrying into the hour and wrapping past midnight.
pub fn add_minutes(time: WallTime, delta: u32) -> WallTime {
    // Reduce first so huge deltas can't overflow the sum
    WallTime::from_minute_of_day(time.minute_of_day() + delta % MINUTES_PER_DAY)
}

/// Truncates an instant to the minute it falls in.
pub fn minute_key<T: Timelike>(instant: &T) -> WallTime {
    WallTime {
        hour: instant.hour() as u8,
        minute: instant.minute() as u8,
    }
}

/// Supplies the current local wall-clock instant.
pub trait TimeSource {
    fn now(&self) -> NaiveDateTime;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn wt(h: u32, m: u32) -> WallTime {
        WallTime::new(h, m).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!("07:00".parse::<WallTime>(), Ok(wt(7, 0)));
        assert_eq!("7:05".parse::<WallTime>(), Ok(wt(7, 5)));
        assert_eq!("23:59".parse::<WallTime>(), Ok(wt(23, 59)));
        assert_eq!(" 00:00 ".parse::<WallTime>(), Ok(wt(0, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["25:99", "24:00", "12:60", "", "abc", "12:5", "12:345", "123:00", "-1:00", "12-30", "+1:00", "12:3a"] {
            assert_eq!(
                input.parse::<WallTime>(),
                Err(AlarmError::InvalidTimeFormat { input: input.to_string() }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_zero_padded() {
        assert_eq!(wt(0, 3).to_string(), "00:03");
        assert_eq!(wt(17, 45).to_string(), "17:45");
    }

    #[test]
    fn test_add_minutes_carries_into_hour() {
        assert_eq!(add_minutes(wt(7, 57), 5), wt(8, 2));
        assert_eq!(add_minutes(wt(7, 0), 0), wt(7, 0));
    }

    #[test]
    fn test_add_minutes_wraps_midnight() {
        assert_eq!(add_minutes(wt(23, 58), 5), wt(0, 3));
        assert_eq!(add_minutes(wt(12, 0), 24 * 60), wt(12, 0));
        assert_eq!(add_minutes(wt(23, 59), u32::MAX), add_minutes(wt(23, 59), u32::MAX % (24 * 60)));
    }

    #[test]
    fn test_minute_key_drops_seconds() {
        let t = NaiveTime::from_hms_milli_opt(6, 30, 59, 999).unwrap();
        assert_eq!(minute_key(&t), wt(6, 30));

        let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 1, 2)
            .unwrap();
        assert_eq!(minute_key(&dt), wt(23, 1));
    }
}
