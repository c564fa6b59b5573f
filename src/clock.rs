use alarm_core::TimeSource;
use chrono::{Local, NaiveDateTime};

/// The host's local wall clock.
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// True between 06:00 and 18:00.
pub fn is_daytime(now: &NaiveDateTime) -> bool {
    use chrono::Timelike;
    (6..18).contains(&now.hour())
}
