//! Wall clock and local time reporting
//!
//! Greetings and the current-time route read the time through `Clock`, so
//! tests can pin it with `FixedClock`.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Current time as reported by `/get-current-time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentTime {
    /// e.g. "Monday, January 6, 2025 at 09:05 AM"
    pub current_time: String,
    pub day_of_week: String,
    pub hour_24: u32,
    pub minute: u32,
    pub timezone: String,
}

/// Hour of day (0..24) in `tz`
pub fn local_hour(clock: &dyn Clock, tz: Tz) -> u32 {
    clock.now_utc().with_timezone(&tz).hour()
}

/// Describe the current instant in `tz`
pub fn current_time(clock: &dyn Clock, tz: Tz) -> CurrentTime {
    let local = clock.now_utc().with_timezone(&tz);

    CurrentTime {
        current_time: local.format("%A, %B %-d, %Y at %I:%M %p").to_string(),
        day_of_week: local.format("%A").to_string(),
        hour_24: local.hour(),
        minute: local.minute(),
        timezone: tz.name().to_string(),
    }
}
