use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Offset, Utc};

use shared_config::AppConfig;

use crate::time::truncate_to_minute;

/// Source of "now" for the clinic. Queue admission depends on the current
/// clinic-local time of day, so services take a clock instead of reading the
/// system time directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time at the clinic.
    fn local_now(&self) -> NaiveDateTime;

    /// Current clinic time of day at minute resolution.
    fn time_of_day(&self) -> NaiveTime {
        truncate_to_minute(self.local_now().time())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        config.clinic_offset().map(Self::new).unwrap_or_else(Self::utc)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}
